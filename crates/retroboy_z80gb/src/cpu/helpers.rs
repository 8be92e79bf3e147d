use super::{Bus, Cpu};

impl Cpu {
    /// Bus read as seen by executing code: core-owned IO registers are
    /// answered locally when interception is enabled.
    #[inline]
    pub(super) fn read8<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        if self.config.intercept_io {
            if let Some(value) = self.read_io(addr) {
                return value;
            }
        }
        bus.read8(addr)
    }

    #[inline]
    pub(super) fn write8<B: Bus>(&mut self, bus: &mut B, addr: u16, value: u8) {
        if self.config.intercept_io && self.write_io(addr, value) {
            return;
        }
        bus.write8(addr, value);
    }

    /// Helper to read an 8-bit register or (HL) by index.
    ///
    /// The encoding matches the standard register order used by the opcode
    /// tables: 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub(super) fn read_reg8<B: Bus>(&mut self, bus: &mut B, index: u8) -> u8 {
        match index & 0x07 {
            0 => self.regs.b(),
            1 => self.regs.c(),
            2 => self.regs.d(),
            3 => self.regs.e(),
            4 => self.regs.h(),
            5 => self.regs.l(),
            6 => {
                let hl = self.regs.hl();
                self.read8(bus, hl)
            }
            _ => self.regs.a(),
        }
    }

    /// Helper to write an 8-bit register or (HL) by index.
    ///
    /// The encoding matches `read_reg8`.
    #[inline]
    pub(super) fn write_reg8<B: Bus>(&mut self, bus: &mut B, index: u8, value: u8) {
        match index & 0x07 {
            0 => self.regs.set_b(value),
            1 => self.regs.set_c(value),
            2 => self.regs.set_d(value),
            3 => self.regs.set_e(value),
            4 => self.regs.set_h(value),
            5 => self.regs.set_l(value),
            6 => {
                let hl = self.regs.hl();
                self.write8(bus, hl, value);
            }
            _ => self.regs.set_a(value),
        }
    }

    /// 16-bit register pair by `rp` index: 0=BC, 1=DE, 2=HL, 3=SP.
    #[inline]
    pub(super) fn read_rp(&self, rp: u8) -> u16 {
        match rp & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn write_rp(&mut self, rp: u8, value: u16) {
        match rp & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let pc = self.regs.pc;
        let value = self.read8(bus, pc);
        self.regs.pc = pc.wrapping_add(1);
        value
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(super) fn read16<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u16 {
        let lo = self.read8(bus, addr);
        let hi = self.read8(bus, addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(super) fn write16<B: Bus>(&mut self, bus: &mut B, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(bus, addr, lo);
        self.write8(bus, addr.wrapping_add(1), hi);
    }

    /// Stack grows downward; afterwards memory[SP] = low, memory[SP+1] = high.
    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let sp = self.regs.sp.wrapping_sub(2);
        self.regs.sp = sp;
        self.write16(bus, sp, value);
    }

    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let sp = self.regs.sp;
        let value = self.read16(bus, sp);
        self.regs.sp = sp.wrapping_add(2);
        value
    }

    /// Non-sequential PC change.
    #[inline]
    pub(super) fn jump<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        self.regs.pc = addr;
        bus.pc_changed(addr);
    }

    /// Relative jump helper used by JR/JR cc.
    ///
    /// The displacement is a signed 8-bit offset relative to the address
    /// following the operand. Returns whether the jump was taken.
    pub(super) fn jr<B: Bus>(&mut self, bus: &mut B, cond: bool) -> bool {
        let offset = self.fetch8(bus) as i8;
        if cond {
            let target = self.regs.pc.wrapping_add(offset as i16 as u16);
            self.jump(bus, target);
        }
        cond
    }

    /// Absolute jump helper used by JP/JP cc,a16.
    pub(super) fn jp_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> bool {
        let addr = self.fetch16(bus);
        if cond {
            self.jump(bus, addr);
        }
        cond
    }

    /// Call helper used by CALL/CALL cc,a16.
    pub(super) fn call_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> bool {
        let addr = self.fetch16(bus);
        if cond {
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.jump(bus, addr);
        }
        cond
    }

    /// Return helper used by RET/RET cc.
    pub(super) fn ret_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> bool {
        if cond {
            let addr = self.pop_u16(bus);
            self.jump(bus, addr);
        }
        cond
    }
}
