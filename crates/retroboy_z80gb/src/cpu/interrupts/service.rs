use super::super::cycles::INTERRUPT_CYCLES;
use super::super::{Bus, Cpu, CpuState};

impl Cpu {
    /// Boundary check for maskable interrupts.
    ///
    /// Returns `Some(cycles)` if an interrupt was accepted, or `None` when
    /// normal dispatch should continue. At most one interrupt is accepted
    /// per boundary.
    pub(in crate::cpu) fn handle_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        if !self.interrupts.check() {
            return None;
        }

        let Some(line) = self.interrupts.highest_pending() else {
            // Nothing deliverable until a request or enable bit changes.
            self.interrupts.set_check(false);
            return None;
        };

        if !self.ime() {
            // With IME clear a requested+enabled line still ends HALT, but
            // the handler is not entered.
            if self.halted() {
                self.wake_from_halt();
            }
            return None;
        }

        bus.acknowledge_interrupt(line.index());

        if self.halted() {
            self.wake_from_halt();
        }

        self.state.remove(CpuState::IME | CpuState::IME_PENDING);
        self.interrupts.clear_request(line);

        let pc = self.regs.pc;
        self.push_u16(bus, pc);
        self.jump(bus, line.vector());

        log::debug!(
            "GB CPU interrupt: idx={} vector=0x{:04X} pc=0x{:04X} sp=0x{:04X} IF=0x{:02X} IE=0x{:02X}",
            line.index(),
            line.vector(),
            pc,
            self.regs.sp,
            self.interrupts.requested(),
            self.interrupts.enabled(),
        );

        let more = self.interrupts.pending() != 0;
        self.interrupts.set_check(more);

        Some(INTERRUPT_CYCLES)
    }
}
