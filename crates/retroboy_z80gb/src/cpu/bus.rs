/// Abstraction over the host's memory-mapped bus.
///
/// All accesses are synchronous and infallible; a host that models open bus
/// returns a sentinel value (typically `0xFF`). Implementations must not call
/// back into the CPU that is driving them.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Little-endian 16-bit read: low byte at `addr`, high byte at
    /// `addr + 1` (wrapping).
    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr);
        let hi = self.read8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Little-endian 16-bit write, see [`Bus::read16`].
    fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo);
        self.write8(addr.wrapping_add(1), hi);
    }

    /// Acknowledge hook invoked once per accepted interrupt with the line
    /// index (0 = VBlank .. 4 = Joypad), before the return address is
    /// pushed. Hosts use it to clear edge-triggered sources.
    ///
    /// The return value is reserved for host signalling and currently
    /// ignored by the core.
    fn acknowledge_interrupt(&mut self, _line: u8) -> i32 {
        0
    }

    /// Called whenever PC moves non-sequentially (jumps, calls, returns,
    /// interrupt vectors) and after the host sets PC directly, so buses that
    /// cache the current code page can refresh it.
    fn pc_changed(&mut self, _pc: u16) {}
}
