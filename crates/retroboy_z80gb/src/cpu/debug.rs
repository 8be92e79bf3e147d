use super::{Bus, Cpu};

impl Cpu {
    /// Minimal disassembly: the byte at `addr` as a hex literal.
    ///
    /// Returns the text and the number of bytes consumed (always 1).
    pub fn disassemble<B: Bus>(&self, bus: &mut B, addr: u16) -> (String, u16) {
        let byte = bus.read8(addr);
        (format!("${byte:02x}"), 1)
    }
}
