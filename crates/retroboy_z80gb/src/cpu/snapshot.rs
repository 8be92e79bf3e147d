use crate::error::{CoreError, Result};

use super::{Cpu, CpuState, Interrupts, Timer};

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Encoded size of a version 1 snapshot in bytes.
pub const SNAPSHOT_LEN: usize = 25;

/// Complete core state for save-states and debug tooling.
///
/// Encoded layout (version 1, all multi-byte fields little-endian):
///
/// | offset | size | field                                   |
/// |--------|------|-----------------------------------------|
/// | 0      | 1    | version (`1`)                           |
/// | 1      | 2    | AF                                      |
/// | 3      | 2    | BC                                      |
/// | 5      | 2    | DE                                      |
/// | 7      | 2    | HL                                      |
/// | 9      | 2    | PC                                      |
/// | 11     | 2    | SP                                      |
/// | 13     | 1    | state (bit0 IME, bit1 HALT, bit2 EI)    |
/// | 14     | 1    | IF                                      |
/// | 15     | 1    | IE                                      |
/// | 16     | 1    | pending-check flag                      |
/// | 17     | 2    | divider accumulator                     |
/// | 19     | 4    | timer accumulator                       |
/// | 23     | 1    | TAC                                     |
/// | 24     | 1    | TMA                                     |
///
/// Bytes past the end of the layout are ignored.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CpuSnapshot {
    pub af: u16,
    pub bc: u16,
    pub de: u16,
    pub hl: u16,
    pub pc: u16,
    pub sp: u16,
    pub state: CpuState,
    pub interrupts: Interrupts,
    pub timer: Timer,
}

impl CpuSnapshot {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SNAPSHOT_LEN);
        out.push(SNAPSHOT_VERSION);
        for word in [self.af, self.bc, self.de, self.hl, self.pc, self.sp] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.push(self.state.bits());
        out.push(self.interrupts.requested());
        out.push(self.interrupts.enabled());
        out.push(u8::from(self.interrupts.check()));
        out.extend_from_slice(&self.timer.divider.to_le_bytes());
        out.extend_from_slice(&self.timer.counter.to_le_bytes());
        out.push(self.timer.tac);
        out.push(self.timer.tma);
        debug_assert_eq!(out.len(), SNAPSHOT_LEN);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let version = *bytes.first().ok_or(CoreError::SnapshotTruncated {
            expected: SNAPSHOT_LEN,
            found: 0,
        })?;
        if version != SNAPSHOT_VERSION {
            return Err(CoreError::UnsupportedSnapshotVersion(version));
        }
        if bytes.len() < SNAPSHOT_LEN {
            return Err(CoreError::SnapshotTruncated {
                expected: SNAPSHOT_LEN,
                found: bytes.len(),
            });
        }

        let mut reader = Reader { bytes, pos: 1 };
        let af = reader.u16();
        let bc = reader.u16();
        let de = reader.u16();
        let hl = reader.u16();
        let pc = reader.u16();
        let sp = reader.u16();
        let state = CpuState::from_bits_truncate(reader.u8());
        let requested = reader.u8();
        let enabled = reader.u8();
        let check = reader.u8() != 0;
        let divider = reader.u16();
        let counter = reader.u32();
        let tac = reader.u8() & 0x07;
        let tma = reader.u8();

        Ok(Self {
            af: af & 0xFFF0,
            bc,
            de,
            hl,
            pc,
            sp,
            state,
            interrupts: Interrupts::from_raw(requested, enabled, check),
            timer: Timer {
                divider,
                counter,
                tac,
                tma,
            },
        })
    }
}

/// Cursor over a buffer whose length has already been checked.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0; N];
        out.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }
}

impl Cpu {
    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            af: self.regs.af(),
            bc: self.regs.bc(),
            de: self.regs.de(),
            hl: self.regs.hl(),
            pc: self.regs.pc,
            sp: self.regs.sp,
            state: self.state,
            interrupts: self.interrupts,
            timer: self.timer,
        }
    }

    /// Load every field of `snapshot`. The bus is told about the new PC at
    /// the next step.
    pub fn restore(&mut self, snapshot: &CpuSnapshot) {
        self.regs.set_af(snapshot.af);
        self.regs.set_bc(snapshot.bc);
        self.regs.set_de(snapshot.de);
        self.regs.set_hl(snapshot.hl);
        self.regs.pc = snapshot.pc;
        self.regs.sp = snapshot.sp;
        self.state = snapshot.state;
        self.interrupts = snapshot.interrupts;
        self.timer = snapshot.timer;
        self.pc_dirty = true;
    }

    /// Serialise the core state into an opaque, versioned blob.
    pub fn export_state(&self) -> Vec<u8> {
        self.snapshot().to_bytes()
    }

    /// Restore state produced by [`Cpu::export_state`]. On error the core is
    /// left untouched.
    pub fn import_state(&mut self, blob: &[u8]) -> Result<()> {
        let snapshot = CpuSnapshot::from_bytes(blob)?;
        log::debug!(
            "GB CPU state import: pc=0x{:04X} sp=0x{:04X} state={:?}",
            snapshot.pc,
            snapshot.sp,
            snapshot.state
        );
        self.restore(&snapshot);
        Ok(())
    }
}
