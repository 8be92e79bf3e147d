use super::{Cpu, DIV_ADDR, IE_ADDR, IF_ADDR, TAC_ADDR, TIMA_ADDR, TMA_ADDR};

impl Cpu {
    /// Read one of the core-owned IO registers.
    ///
    /// Returns `None` for addresses the core does not own.
    pub fn read_io(&self, addr: u16) -> Option<u8> {
        let value = match addr {
            DIV_ADDR => self.timer.div(),
            TIMA_ADDR => self.timer.tima(),
            TMA_ADDR => self.timer.tma(),
            TAC_ADDR => self.timer.tac(),
            // Upper three bits of IF are unused and read back as 1.
            IF_ADDR => self.interrupts.requested() | 0xE0,
            IE_ADDR => self.interrupts.enabled(),
            _ => return None,
        };
        Some(value)
    }

    /// Write one of the core-owned IO registers.
    ///
    /// Returns `false` (and does nothing) for addresses the core does not
    /// own.
    pub fn write_io(&mut self, addr: u16, value: u8) -> bool {
        match addr {
            DIV_ADDR => {
                log::trace!("GB DIV reset at pc=0x{:04X}", self.regs.pc);
                self.timer.reset_div();
            }
            TIMA_ADDR => self.timer.write_tima(value),
            TMA_ADDR => self.timer.write_tma(value),
            TAC_ADDR => {
                log::trace!("GB TAC <- 0x{value:02X}");
                self.timer.write_tac(value);
            }
            IF_ADDR => self.interrupts.set_requested(value),
            IE_ADDR => self.interrupts.set_enabled(value),
            _ => return false,
        }
        true
    }
}
