use crate::cpu::{Bus, Cpu, Flags};

impl Cpu {
    /// Condition field of JR/JP/CALL/RET cc: NZ, Z, NC, C.
    #[inline]
    fn cc_condition(&self, opcode: u8) -> bool {
        match (opcode >> 3) & 0x03 {
            0 => !self.get_flag(Flags::Z),
            1 => self.get_flag(Flags::Z),
            2 => !self.get_flag(Flags::C),
            _ => self.get_flag(Flags::C),
        }
    }

    pub(super) fn exec_jr_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> bool {
        debug_assert!(matches!(opcode, 0x20 | 0x28 | 0x30 | 0x38));
        self.jr(bus, self.cc_condition(opcode))
    }

    pub(super) fn exec_jp_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> bool {
        debug_assert!(matches!(opcode, 0xC2 | 0xCA | 0xD2 | 0xDA));
        self.jp_cond(bus, self.cc_condition(opcode))
    }

    pub(super) fn exec_jp_hl<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.regs.hl();
        self.jump(bus, addr);
    }

    pub(super) fn exec_call_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> bool {
        debug_assert!(matches!(opcode, 0xC4 | 0xCC | 0xD4 | 0xDC));
        self.call_cond(bus, self.cc_condition(opcode))
    }

    pub(super) fn exec_ret_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> bool {
        debug_assert!(matches!(opcode, 0xC0 | 0xC8 | 0xD0 | 0xD8));
        self.ret_cond(bus, self.cc_condition(opcode))
    }
}
