mod run;

use super::cycles::CYCLES;
use super::exec::HALT_OPCODE;
use super::{Bus, Cpu, CpuState};

impl Cpu {
    /// Run one instruction boundary and return the number of T-cycles taken.
    ///
    /// A boundary first checks for a deliverable interrupt (charging the
    /// fixed entry cost and jumping to its vector), then dispatches exactly
    /// one instruction, or idles for one HALT cycle while halted. The
    /// charged cycles drive the divider and timer before returning, so a
    /// timer overflow is seen by the next boundary.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.sync_pc(bus);

        let mut cycles = 0;
        if let Some(entry) = self.handle_interrupts(bus) {
            self.advance_timers(entry);
            cycles += entry;
        }

        let executed = if self.halted() {
            // While halted the core idles at the HALT cost until an
            // interrupt line wakes it.
            CYCLES[HALT_OPCODE as usize] as u32
        } else {
            let armed = self.state.contains(CpuState::IME_PENDING);
            let opcode = self.fetch8(bus);
            let executed = self.exec_opcode(bus, opcode);
            self.apply_ime_delay(armed);
            executed
        };
        self.advance_timers(executed);

        cycles + executed
    }

    /// Report a PC written from outside dispatch to the bus.
    #[inline]
    fn sync_pc<B: Bus>(&mut self, bus: &mut B) {
        if self.pc_dirty {
            self.pc_dirty = false;
            bus.pc_changed(self.regs.pc);
        }
    }
}
