use super::super::cycles::MIN_INSTRUCTION_CYCLES;
use super::super::{Bus, Cpu};

impl Cpu {
    /// Execute instructions until at least `budget` cycles have been
    /// consumed and return the cycles actually consumed.
    ///
    /// Instructions are never split, so the result may exceed `budget` by
    /// up to the cost of the last boundary; it is never less. At least one
    /// boundary runs even for a zero budget.
    pub fn run<B: Bus>(&mut self, bus: &mut B, budget: u32) -> u64 {
        let budget = u64::from(budget);
        let mut consumed = 0;
        loop {
            consumed += u64::from(self.step(bus));
            if consumed >= budget {
                break;
            }
        }
        consumed
    }

    /// Let `cycles` of time pass without executing instructions, e.g. for
    /// bus wait states.
    ///
    /// Time is consumed in steps of the cheapest instruction cost, so the
    /// returned amount is `cycles` rounded up to a multiple of 4. The
    /// divider and timer keep running; registers are untouched.
    pub fn burn(&mut self, cycles: u32) -> u64 {
        let step = u64::from(MIN_INSTRUCTION_CYCLES);
        let burned = u64::from(cycles).div_ceil(step) * step;
        self.advance_timers_idle(burned);
        burned
    }
}
