use crate::error::Result;

use super::{Cpu, Reg, Reg8};

impl Cpu {
    pub fn get_register(&self, reg: Reg) -> u16 {
        match reg {
            Reg::Pc => self.regs.pc,
            Reg::Sp => self.regs.sp,
            Reg::Af => self.regs.af(),
            Reg::Bc => self.regs.bc(),
            Reg::De => self.regs.de(),
            Reg::Hl => self.regs.hl(),
            Reg::IrqState => self.interrupts.requested() as u16,
        }
    }

    /// Write a named register. Writing PC schedules a `pc_changed`
    /// notification for the bus at the next step.
    pub fn set_register(&mut self, reg: Reg, value: u16) {
        match reg {
            Reg::Pc => self.set_pc(value),
            Reg::Sp => self.regs.sp = value,
            Reg::Af => self.regs.set_af(value),
            Reg::Bc => self.regs.set_bc(value),
            Reg::De => self.regs.set_de(value),
            Reg::Hl => self.regs.set_hl(value),
            Reg::IrqState => self.interrupts.set_requested(value as u8),
        }
    }

    /// Id-based read for tooling; unknown ids are `CoreError::InvalidRegister`.
    pub fn get_register_by_id(&self, id: u8) -> Result<u16> {
        Ok(self.get_register(Reg::try_from(id)?))
    }

    pub fn set_register_by_id(&mut self, id: u8, value: u16) -> Result<()> {
        self.set_register(Reg::try_from(id)?, value);
        Ok(())
    }

    pub fn get_reg8(&self, reg: Reg8) -> u8 {
        self.regs.reg8(reg)
    }

    pub fn set_reg8(&mut self, reg: Reg8, value: u8) {
        self.regs.set_reg8(reg, value);
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.regs.pc = pc;
        self.pc_dirty = true;
    }

    #[inline]
    pub fn sp(&self) -> u16 {
        self.regs.sp
    }

    pub fn set_sp(&mut self, sp: u16) {
        self.regs.sp = sp;
    }
}
