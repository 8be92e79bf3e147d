pub mod config;
pub mod cpu;
pub mod error;
pub mod flat_bus;

pub use config::CpuConfig;
pub use cpu::{Bus, Cpu, CpuSnapshot, Flags, InterruptLine, Reg, Reg8, Registers};
pub use error::{CoreError, Result};
pub use flat_bus::FlatBus;

/// Number of CPU T-cycles in one DMG video frame (154 lines × 456 dots).
pub const CYCLES_PER_FRAME: u32 = 70_224;
