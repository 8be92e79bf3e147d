use crate::cpu::{Bus, Cpu, CpuState};

impl Cpu {
    /// HALT parks PC on the HALT opcode itself; leaving HALT steps past it.
    pub(super) fn exec_halt(&mut self) {
        self.regs.pc = self.regs.pc.wrapping_sub(1);
        self.state.insert(CpuState::HALTED);
        log::debug!(
            "GB CPU entering HALT at pc=0x{:04X} (IME={})",
            self.regs.pc,
            self.ime()
        );
    }

    /// STOP is a two-byte instruction; the padding byte is fetched and
    /// discarded. Without a joypad the low-power state is not modelled and
    /// execution simply continues.
    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) {
        let _padding = self.fetch8(bus);
    }

    pub(super) fn exec_di(&mut self) {
        self.state.remove(CpuState::IME | CpuState::IME_PENDING);
    }

    pub(super) fn exec_ei(&mut self) {
        if self.config.ei_delay {
            // IME becomes 1 after the *next* instruction completes.
            if !self.ime() {
                self.state.insert(CpuState::IME_PENDING);
            }
        } else {
            self.set_ime(true);
        }
    }

    pub(super) fn exec_unassigned(&mut self, opcode: u8) {
        log::warn!(
            "GB CPU unassigned opcode 0x{opcode:02X} at PC=0x{pc:04X} executed as NOP (SP=0x{sp:04X} AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
            opcode = opcode,
            pc = self.regs.pc.wrapping_sub(1),
            sp = self.regs.sp,
            af = self.regs.af(),
            bc = self.regs.bc(),
            de = self.regs.de(),
            hl = self.regs.hl(),
        );
    }
}
