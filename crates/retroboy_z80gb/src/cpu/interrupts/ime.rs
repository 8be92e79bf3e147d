use super::super::{Cpu, CpuState};

impl Cpu {
    /// Apply a delayed IME change requested by EI.
    ///
    /// `armed` is whether EI was already pending before the instruction that
    /// just completed; IME rises only once that following instruction has
    /// run, and only if it did not cancel the request (DI).
    #[inline]
    pub(in crate::cpu) fn apply_ime_delay(&mut self, armed: bool) {
        if armed && self.state.contains(CpuState::IME_PENDING) {
            self.state.remove(CpuState::IME_PENDING);
            self.state.insert(CpuState::IME);
            self.interrupts.set_check(true);
        }
    }

    /// Leave HALT, stepping PC past the HALT opcode it was parked on.
    pub(in crate::cpu) fn wake_from_halt(&mut self) {
        self.state.remove(CpuState::HALTED);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        log::debug!("GB CPU leaving HALT at pc=0x{:04X}", self.regs.pc);
    }
}
