mod ime;
mod service;

use super::Cpu;

/// Interrupt request register (IF).
pub const IF_ADDR: u16 = 0xFF0F;
/// Interrupt enable register (IE).
pub const IE_ADDR: u16 = 0xFFFF;

/// Mask of the five implemented interrupt lines.
const LINE_MASK: u8 = 0x1F;

/// Maskable interrupt lines in priority order (lowest index wins).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum InterruptLine {
    VBlank = 0,
    LcdStat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl InterruptLine {
    pub const ALL: [InterruptLine; 5] = [
        InterruptLine::VBlank,
        InterruptLine::LcdStat,
        InterruptLine::Timer,
        InterruptLine::Serial,
        InterruptLine::Joypad,
    ];

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn bit(self) -> u8 {
        1 << self.index()
    }

    /// Fixed handler address: `0x40 + 8 * index`.
    #[inline]
    pub const fn vector(self) -> u16 {
        0x0040 + 8 * self.index() as u16
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Interrupt request (IF) and enable (IE) bitmaps plus the pending-check
/// flag consulted at every instruction boundary.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Interrupts {
    requested: u8,
    enabled: u8,
    check: bool,
}

impl Interrupts {
    pub fn new() -> Self {
        Self::default()
    }

    pub(in crate::cpu) fn from_raw(requested: u8, enabled: u8, check: bool) -> Self {
        Self {
            requested: requested & LINE_MASK,
            enabled: enabled & LINE_MASK,
            check,
        }
    }

    /// Raw IF bitmap (five low bits).
    #[inline]
    pub fn requested(&self) -> u8 {
        self.requested
    }

    pub fn set_requested(&mut self, value: u8) {
        self.requested = value & LINE_MASK;
        self.check = true;
    }

    /// Raw IE bitmap (five low bits).
    #[inline]
    pub fn enabled(&self) -> u8 {
        self.enabled
    }

    pub fn set_enabled(&mut self, value: u8) {
        self.enabled = value & LINE_MASK;
        self.check = true;
    }

    pub fn enable(&mut self, line: InterruptLine, enabled: bool) {
        if enabled {
            self.set_enabled(self.enabled | line.bit());
        } else {
            self.enabled &= !line.bit();
        }
    }

    pub fn request(&mut self, line: InterruptLine) {
        self.requested |= line.bit();
        self.check = true;
    }

    pub fn is_requested(&self, line: InterruptLine) -> bool {
        self.requested & line.bit() != 0
    }

    /// Lines that are both requested and enabled.
    #[inline]
    pub fn pending(&self) -> u8 {
        self.requested & self.enabled & LINE_MASK
    }

    /// Highest-priority line that is both requested and enabled.
    pub fn highest_pending(&self) -> Option<InterruptLine> {
        let pending = self.pending();
        if pending == 0 {
            return None;
        }
        InterruptLine::from_index(pending.trailing_zeros() as u8)
    }

    /// Whether some source may have become deliverable since the last
    /// boundary check.
    #[inline]
    pub fn check(&self) -> bool {
        self.check
    }

    #[inline]
    pub(in crate::cpu) fn set_check(&mut self, value: bool) {
        self.check = value;
    }

    #[inline]
    pub(in crate::cpu) fn clear_request(&mut self, line: InterruptLine) {
        self.requested &= !line.bit();
    }

    pub(in crate::cpu) fn clear_requests(&mut self) {
        self.requested = 0;
        self.check = false;
    }
}

impl Cpu {
    /// Assert or release a host-driven interrupt line.
    ///
    /// Asserting sets the line's request bit; releasing clears it.
    pub fn set_irq_line(&mut self, line: InterruptLine, asserted: bool) {
        if asserted {
            self.interrupts.request(line);
        } else {
            self.interrupts.clear_request(line);
        }
    }

    pub fn request_interrupt(&mut self, line: InterruptLine) {
        self.interrupts.request(line);
    }

    /// Drop every outstanding interrupt request.
    pub fn clear_pending_interrupts(&mut self) {
        self.interrupts.clear_requests();
    }
}
