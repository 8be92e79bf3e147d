use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_ld_rr_d16<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));
        let value = self.fetch16(bus);
        self.write_rp(opcode >> 4, value);
    }

    pub(super) fn exec_ld_r_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(
            opcode,
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E
        ));

        let value = self.fetch8(bus);
        self.write_reg8(bus, (opcode >> 3) & 0x07, value);
    }

    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.fetch16(bus);
        let sp = self.regs.sp;
        self.write16(bus, addr, sp);
    }

    pub(super) fn exec_ldh_a8<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0xE0 | 0xF0));

        let addr = 0xFF00 | self.fetch8(bus) as u16;
        if opcode == 0xE0 {
            let a = self.regs.a();
            self.write8(bus, addr, a);
        } else {
            let value = self.read8(bus, addr);
            self.regs.set_a(value);
        }
    }

    pub(super) fn exec_ldh_c<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0xE2 | 0xF2));

        let addr = 0xFF00 | self.regs.c() as u16;
        if opcode == 0xE2 {
            let a = self.regs.a();
            self.write8(bus, addr, a);
        } else {
            let value = self.read8(bus, addr);
            self.regs.set_a(value);
        }
    }

    pub(super) fn exec_ld_a16_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0xEA | 0xFA));

        let addr = self.fetch16(bus);
        if opcode == 0xEA {
            let a = self.regs.a();
            self.write8(bus, addr, a);
        } else {
            let value = self.read8(bus, addr);
            self.regs.set_a(value);
        }
    }

    /// Address for the `(BC)`, `(DE)`, `(HL+)`, `(HL-)` forms, applying the
    /// HL post-increment/decrement.
    fn indirect_addr(&mut self, opcode: u8) -> u16 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0x02 | 0x12 | 0x22 | 0x32));
        let addr = self.indirect_addr(opcode);
        let a = self.regs.a();
        self.write8(bus, addr, a);
    }

    pub(super) fn exec_ld_a_indirect<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0x0A | 0x1A | 0x2A | 0x3A));
        let addr = self.indirect_addr(opcode);
        let value = self.read8(bus, addr);
        self.regs.set_a(value);
    }

    pub(super) fn exec_ld_r_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!((0x40..=0x7F).contains(&opcode) && opcode != 0x76);

        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let value = self.read_reg8(bus, src);
        self.write_reg8(bus, dst, value);
    }

    pub(super) fn exec_ld_sp_hl(&mut self) {
        self.regs.sp = self.regs.hl();
    }
}
