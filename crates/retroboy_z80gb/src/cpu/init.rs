use crate::config::CpuConfig;

use super::{Cpu, CpuState, Interrupts, Registers, Timer};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self::with_config(CpuConfig::default())
    }

    pub fn with_config(config: CpuConfig) -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            state: CpuState::empty(),
            interrupts: Interrupts::new(),
            timer: Timer::new(),
            config,
            total_cycles: 0,
            pc_dirty: false,
        };
        cpu.apply_dmg_boot_state();
        cpu
    }

    /// Reset the CPU to its power-on state.
    ///
    /// The configuration and the elapsed-cycle counter survive a reset;
    /// everything else is reinitialised, so two resets in a row leave the
    /// same state as one.
    pub fn reset(&mut self) {
        self.interrupts = Interrupts::new();
        self.timer = Timer::new();
        self.apply_dmg_boot_state();
    }

    /// Initialize registers to match the DMG boot ROM's state after it
    /// hands control to cartridge code.
    fn apply_dmg_boot_state(&mut self) {
        self.regs.set_af(0x01B0); // Z, H, C set
        self.regs.set_bc(0x0013);
        self.regs.set_de(0x00D8);
        self.regs.set_hl(0x014D);
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;

        // IME is clear when control reaches 0x0100; software enables
        // interrupts itself via EI/RETI.
        self.state = CpuState::empty();
        self.pc_dirty = true;
    }
}
