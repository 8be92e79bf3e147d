use super::{Cpu, InterruptLine};

/// Divider register (DIV).
pub const DIV_ADDR: u16 = 0xFF04;
/// Timer counter (TIMA).
pub const TIMA_ADDR: u16 = 0xFF05;
/// Timer modulo (TMA).
pub const TMA_ADDR: u16 = 0xFF06;
/// Timer control (TAC).
pub const TAC_ADDR: u16 = 0xFF07;

/// Timer / divider unit driven by executed cycle counts.
///
/// Two accumulators are fed with every charged cycle: a free-running
/// divider whose upper byte is DIV, and (while TAC bit 2 is set) a timer
/// accumulator whose value shifted right by the TAC-selected prescaler is
/// TIMA. When TIMA would pass 0xFF the accumulator is reloaded from TMA and
/// the timer interrupt is requested.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Timer {
    pub(in crate::cpu) divider: u16,
    pub(in crate::cpu) counter: u32,
    pub(in crate::cpu) tac: u8,
    pub(in crate::cpu) tma: u8,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// Prescaler shift selected by TAC[1:0]:
    /// - 00 → 1024 cycles per tick (4096 Hz)
    /// - 01 → 16 cycles (262144 Hz)
    /// - 10 → 64 cycles (65536 Hz)
    /// - 11 → 256 cycles (16384 Hz)
    #[inline]
    pub fn shift(&self) -> u32 {
        match self.tac & 0x03 {
            0x00 => 10,
            0x01 => 4,
            0x02 => 6,
            _ => 8,
        }
    }

    pub fn div(&self) -> u8 {
        (self.divider >> 8) as u8
    }

    pub fn tima(&self) -> u8 {
        (self.counter >> self.shift()) as u8
    }

    pub fn tma(&self) -> u8 {
        self.tma
    }

    /// TAC as read back by software; the unused upper bits read as 1.
    pub fn tac(&self) -> u8 {
        self.tac | 0xF8
    }

    /// Any write to DIV clears the divider.
    pub fn reset_div(&mut self) {
        self.divider = 0;
    }

    pub fn write_tima(&mut self, value: u8) {
        self.counter = (value as u32) << self.shift();
    }

    pub fn write_tma(&mut self, value: u8) {
        self.tma = value;
    }

    /// Changing the prescaler keeps the visible TIMA value.
    pub fn write_tac(&mut self, value: u8) {
        let tima = self.tima();
        self.tac = value & 0x07;
        self.counter = (tima as u32) << self.shift();
    }

    /// Feed one boundary's `cycles` into both accumulators.
    ///
    /// Returns `true` when TIMA overflowed and was reloaded from TMA. Cycles
    /// past the overflow within the same boundary are dropped.
    pub(in crate::cpu) fn advance(&mut self, cycles: u32) -> bool {
        self.divider = self.divider.wrapping_add(cycles as u16);
        if !self.enabled() {
            return false;
        }

        self.counter = self.counter.saturating_add(cycles);
        let shift = self.shift();
        if (self.counter >> shift) > 0xFF {
            self.reload();
            return true;
        }
        false
    }

    /// Feed `cycles` of idle time, as a run of 4-cycle boundaries, in one go.
    ///
    /// The result matches calling [`Timer::advance`] with 4 once per
    /// boundary. `cycles` must be a multiple of 4.
    pub(in crate::cpu) fn advance_idle(&mut self, cycles: u64) -> bool {
        debug_assert_eq!(cycles % 4, 0);
        // The divider wraps at 16 bits, so only the low bits matter.
        self.divider = self.divider.wrapping_add(cycles as u16);
        if !self.enabled() {
            return false;
        }

        let first = self.cycles_to_overflow();
        if cycles < first {
            // first is at most 0x100 << 10, so this fits.
            self.counter += cycles as u32;
            return false;
        }

        self.reload();
        // After the first reload TIMA overflows with a fixed period.
        let rest = (cycles - first) % self.cycles_to_overflow();
        self.counter += rest as u32;
        true
    }

    /// Idle cycles, in 4-cycle boundaries, until the next overflow.
    fn cycles_to_overflow(&self) -> u64 {
        let limit = 0x100u64 << self.shift();
        let left = limit.saturating_sub(u64::from(self.counter));
        left.div_ceil(4).max(1) * 4
    }

    fn reload(&mut self) {
        self.counter = (self.tma as u32) << self.shift();
    }
}

impl Cpu {
    /// Account `cycles` of elapsed time: elapsed clock, divider and timer.
    #[inline]
    pub(in crate::cpu) fn advance_timers(&mut self, cycles: u32) {
        self.total_cycles += cycles as u64;
        if self.timer.advance(cycles) {
            self.timer_overflowed();
        }
    }

    /// Like [`Cpu::advance_timers`] for a stretch of idle 4-cycle boundaries.
    pub(in crate::cpu) fn advance_timers_idle(&mut self, cycles: u64) {
        self.total_cycles = self.total_cycles.saturating_add(cycles);
        if self.timer.advance_idle(cycles) {
            self.timer_overflowed();
        }
    }

    fn timer_overflowed(&mut self) {
        log::trace!("GB timer overflow, TIMA reloaded with 0x{:02X}", self.timer.tma);
        self.interrupts.request(InterruptLine::Timer);
    }
}
