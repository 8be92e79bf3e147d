use typed_builder::TypedBuilder;

/// Behavioural knobs for a [`Cpu`](crate::Cpu) instance.
///
/// ```
/// use retroboy_z80gb::{Cpu, CpuConfig};
///
/// let config = CpuConfig::builder().ei_delay(false).build();
/// let cpu = Cpu::with_config(config);
/// assert!(!cpu.config().ei_delay);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, TypedBuilder)]
pub struct CpuConfig {
    /// When set, `EI` only raises IME once the following instruction has
    /// completed, matching DMG hardware. When clear, IME is raised
    /// immediately.
    #[builder(default = true)]
    pub ei_delay: bool,
    /// When set, bus accesses to the core-owned IO registers (DIV, TIMA,
    /// TMA, TAC, IF and IE) are serviced by the core and never reach the
    /// host bus.
    #[builder(default = true)]
    pub intercept_io: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
