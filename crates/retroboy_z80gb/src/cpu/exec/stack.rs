use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// PUSH rr; the `rp2` encoding uses AF instead of SP.
    pub(super) fn exec_push_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0xC5 | 0xD5 | 0xE5 | 0xF5));

        let value = match (opcode >> 4) & 0x03 {
            3 => self.regs.af(),
            rp => self.read_rp(rp),
        };
        self.push_u16(bus, value);
    }

    /// POP rr. `POP AF` masks the low nibble of F.
    pub(super) fn exec_pop_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0xC1 | 0xD1 | 0xE1 | 0xF1));

        let value = self.pop_u16(bus);
        match (opcode >> 4) & 0x03 {
            3 => self.regs.set_af(value),
            rp => self.write_rp(rp, value),
        }
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(
            opcode,
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF
        ));

        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.jump(bus, (opcode & 0x38) as u16);
    }

    /// RETI enables IME immediately, without the EI delay.
    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) {
        self.ret_cond(bus, true);
        self.set_ime(true);
    }
}
