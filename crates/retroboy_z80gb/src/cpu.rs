mod access;
mod alu;
mod bus;
mod cb;
pub mod cycles;
mod debug;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod io;
mod regs;
mod snapshot;
mod step;
mod timer;

pub use bus::Bus;
pub use interrupts::{InterruptLine, Interrupts, IE_ADDR, IF_ADDR};
pub use regs::{CpuState, Flags, Reg, Reg8, Registers};
pub use snapshot::{CpuSnapshot, SNAPSHOT_LEN, SNAPSHOT_VERSION};
pub use timer::{Timer, DIV_ADDR, TAC_ADDR, TIMA_ADDR, TMA_ADDR};

use crate::config::CpuConfig;

/// Game Boy CPU core (a Z80 derivative, the Sharp LR35902).
///
/// One instance owns the register file together with the timer and the
/// interrupt request/enable registers that feed it. The core is strictly
/// single-threaded: the host drives it through [`Cpu::run`] or
/// [`Cpu::step`] and hands in the bus on every call.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    state: CpuState,
    interrupts: Interrupts,
    timer: Timer,
    config: CpuConfig,
    /// Every cycle charged since power-on.
    total_cycles: u64,
    /// PC was written from outside dispatch; tell the bus at the next step.
    pc_dirty: bool,
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flags) -> bool {
        self.regs.f().contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        let mut f = self.regs.f();
        f.set(flag, value);
        self.regs.set_f(f);
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.set_f(Flags::empty());
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    pub fn state(&self) -> CpuState {
        self.state
    }

    #[inline]
    pub fn ime(&self) -> bool {
        self.state.contains(CpuState::IME)
    }

    /// Set or clear IME directly. Any pending `EI` is dropped.
    pub fn set_ime(&mut self, enabled: bool) {
        self.state.set(CpuState::IME, enabled);
        self.state.remove(CpuState::IME_PENDING);
        if enabled {
            self.interrupts.set_check(true);
        }
    }

    #[inline]
    pub fn halted(&self) -> bool {
        self.state.contains(CpuState::HALTED)
    }

    pub fn interrupts(&self) -> &Interrupts {
        &self.interrupts
    }

    pub fn interrupts_mut(&mut self) -> &mut Interrupts {
        &mut self.interrupts
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut Timer {
        &mut self.timer
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }
}

#[cfg(test)]
mod tests;
