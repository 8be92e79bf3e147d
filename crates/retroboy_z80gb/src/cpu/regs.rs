use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::CoreError;

bitflags! {
    /// Flag bits in the F register.
    ///
    /// Layout (bit index in the byte, from MSB to LSB):
    /// - bit 7: Z (zero)
    /// - bit 6: N (subtract)
    /// - bit 5: H (half carry)
    /// - bit 4: C (carry)
    /// - bits 0–3 are always zero.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Flags: u8 {
        const Z = 0x80;
        const N = 0x40;
        const H = 0x20;
        const C = 0x10;
    }
}

bitflags! {
    /// Control state byte: interrupt master enable plus the HALT latch.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct CpuState: u8 {
        /// Interrupt master enable.
        const IME = 0x01;
        /// Sleeping in HALT until an interrupt line wakes the core.
        const HALTED = 0x02;
        /// `EI` executed; IME rises after the next instruction.
        const IME_PENDING = 0x04;
    }
}

/// Registers for the Game Boy CPU (LR35902).
///
/// Each pair is stored as a single 16-bit value. The high half is the first
/// register of the name (A in AF, B in BC, ...), the low half the second, so
/// 16-bit and 8-bit accesses always observe the same bits regardless of the
/// host byte order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Registers {
    af: u16,
    bc: u16,
    de: u16,
    hl: u16,
    pub sp: u16,
    pub pc: u16,
}

#[inline]
const fn high(pair: u16) -> u8 {
    (pair >> 8) as u8
}

#[inline]
const fn low(pair: u16) -> u8 {
    pair as u8
}

#[inline]
const fn with_high(pair: u16, value: u8) -> u16 {
    (pair & 0x00FF) | ((value as u16) << 8)
}

#[inline]
const fn with_low(pair: u16, value: u8) -> u16 {
    (pair & 0xFF00) | value as u16
}

impl Registers {
    #[inline]
    pub fn af(&self) -> u16 {
        self.af
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        // Lower 4 bits of F are always zero.
        self.af = value & 0xFFF0;
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        self.bc
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        self.bc = value;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        self.de
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        self.de = value;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.hl
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.hl = value;
    }

    #[inline]
    pub fn a(&self) -> u8 {
        high(self.af)
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.af = with_high(self.af, value);
    }

    #[inline]
    pub fn f(&self) -> Flags {
        Flags::from_bits_truncate(low(self.af))
    }

    #[inline]
    pub fn set_f(&mut self, flags: Flags) {
        self.af = with_low(self.af, flags.bits());
    }

    #[inline]
    pub fn b(&self) -> u8 {
        high(self.bc)
    }

    #[inline]
    pub fn set_b(&mut self, value: u8) {
        self.bc = with_high(self.bc, value);
    }

    #[inline]
    pub fn c(&self) -> u8 {
        low(self.bc)
    }

    #[inline]
    pub fn set_c(&mut self, value: u8) {
        self.bc = with_low(self.bc, value);
    }

    #[inline]
    pub fn d(&self) -> u8 {
        high(self.de)
    }

    #[inline]
    pub fn set_d(&mut self, value: u8) {
        self.de = with_high(self.de, value);
    }

    #[inline]
    pub fn e(&self) -> u8 {
        low(self.de)
    }

    #[inline]
    pub fn set_e(&mut self, value: u8) {
        self.de = with_low(self.de, value);
    }

    #[inline]
    pub fn h(&self) -> u8 {
        high(self.hl)
    }

    #[inline]
    pub fn set_h(&mut self, value: u8) {
        self.hl = with_high(self.hl, value);
    }

    #[inline]
    pub fn l(&self) -> u8 {
        low(self.hl)
    }

    #[inline]
    pub fn set_l(&mut self, value: u8) {
        self.hl = with_low(self.hl, value);
    }

    pub fn reg8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a(),
            Reg8::F => self.f().bits(),
            Reg8::B => self.b(),
            Reg8::C => self.c(),
            Reg8::D => self.d(),
            Reg8::E => self.e(),
            Reg8::H => self.h(),
            Reg8::L => self.l(),
        }
    }

    pub fn set_reg8(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.set_a(value),
            Reg8::F => self.set_f(Flags::from_bits_truncate(value)),
            Reg8::B => self.set_b(value),
            Reg8::C => self.set_c(value),
            Reg8::D => self.set_d(value),
            Reg8::E => self.set_e(value),
            Reg8::H => self.set_h(value),
            Reg8::L => self.set_l(value),
        }
    }
}

/// Named 16-bit registers exposed to the host.
///
/// The numeric identifiers are stable and used by id-based tooling
/// (`Reg::try_from(3u8)` is `AF`). `IrqState` reads and writes the
/// interrupt request bitmap (IF).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Reg {
    Pc = 1,
    Sp = 2,
    Af = 3,
    Bc = 4,
    De = 5,
    Hl = 6,
    IrqState = 7,
}

impl Reg {
    pub const ALL: [Reg; 7] = [
        Reg::Pc,
        Reg::Sp,
        Reg::Af,
        Reg::Bc,
        Reg::De,
        Reg::Hl,
        Reg::IrqState,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Reg::Pc => "PC",
            Reg::Sp => "SP",
            Reg::Af => "AF",
            Reg::Bc => "BC",
            Reg::De => "DE",
            Reg::Hl => "HL",
            Reg::IrqState => "IRQ",
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl TryFrom<u8> for Reg {
    type Error = CoreError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Reg::ALL
            .into_iter()
            .find(|reg| *reg as u8 == id)
            .ok_or_else(|| CoreError::InvalidRegister(id.to_string()))
    }
}

impl FromStr for Reg {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reg::ALL
            .into_iter()
            .find(|reg| reg.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidRegister(s.to_string()))
    }
}

/// Named 8-bit register halves.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
}
