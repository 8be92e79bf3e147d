use crate::cpu::{Bus, Cpu, Flags};

impl Cpu {
    pub(super) fn exec_alu_reg_group<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!((0x80..=0xBF).contains(&opcode));
        let operation = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, opcode & 0x07);
        self.alu_op(operation, value);
    }

    pub(super) fn exec_alu_imm<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(
            opcode,
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE
        ));
        let value = self.fetch8(bus);
        self.alu_op((opcode >> 3) & 0x07, value);
    }

    /// RLCA, RRCA, RLA and RRA. Unlike their prefixed forms these always
    /// clear Z.
    pub(super) fn exec_rotate_a(&mut self, opcode: u8) {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));

        let a = self.regs.a();
        let carry_in = self.get_flag(Flags::C);
        let (result, carry_out) = match opcode {
            // RLCA: bit 7 to carry and bit 0.
            0x07 => (a.rotate_left(1), a & 0x80 != 0),
            // RRCA: bit 0 to carry and bit 7.
            0x0F => (a.rotate_right(1), a & 0x01 != 0),
            // RLA: through carry.
            0x17 => ((a << 1) | u8::from(carry_in), a & 0x80 != 0),
            // RRA: through carry.
            _ => ((a >> 1) | (u8::from(carry_in) << 7), a & 0x01 != 0),
        };

        self.regs.set_a(result);
        let mut f = Flags::empty();
        f.set(Flags::C, carry_out);
        self.regs.set_f(f);
    }

    pub(super) fn exec_add_hl_rr(&mut self, opcode: u8) {
        debug_assert!(matches!(opcode, 0x09 | 0x19 | 0x29 | 0x39));
        let value = self.read_rp(opcode >> 4);
        self.alu_add16_hl(value);
    }

    pub(super) fn exec_add_sp_r8<B: Bus>(&mut self, bus: &mut B) {
        let imm = self.fetch8(bus);
        self.regs.sp = self.alu_add16_signed(self.regs.sp, imm);
    }

    pub(super) fn exec_ld_hl_sp_r8<B: Bus>(&mut self, bus: &mut B) {
        let imm = self.fetch8(bus);
        let result = self.alu_add16_signed(self.regs.sp, imm);
        self.regs.set_hl(result);
    }

    pub(super) fn exec_cpl(&mut self) {
        self.regs.set_a(!self.regs.a());
        self.set_flag(Flags::H, true);
        self.set_flag(Flags::N, true);
    }

    pub(super) fn exec_scf(&mut self) {
        self.set_flag(Flags::C, true);
        self.set_flag(Flags::H, false);
        self.set_flag(Flags::N, false);
    }

    pub(super) fn exec_ccf(&mut self) {
        let carry = self.get_flag(Flags::C);
        self.set_flag(Flags::C, !carry);
        self.set_flag(Flags::H, false);
        self.set_flag(Flags::N, false);
    }
}
