use crate::cpu::Bus;

const MEMORY_SIZE: usize = 0x10000;

/// Serial transfer data (SB).
const SB: u16 = 0xFF01;
/// Serial transfer control (SC).
const SC: u16 = 0xFF02;

/// Flat 64 KiB RAM bus.
///
/// Every address is plain read/write memory. Writing `0x81` to SC starts a
/// serial transfer that completes instantly: the byte in SB is appended to
/// [`FlatBus::serial_output`], which is how test ROMs report results.
pub struct FlatBus {
    pub memory: Box<[u8; MEMORY_SIZE]>,
    serial: Vec<u8>,
    pc_changes: u64,
    acknowledged: Vec<u8>,
}

impl Default for FlatBus {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatBus {
    pub fn new() -> Self {
        Self {
            memory: Box::new([0; MEMORY_SIZE]),
            serial: Vec::new(),
            pc_changes: 0,
            acknowledged: Vec::new(),
        }
    }

    /// Copy `rom` to the start of the address space. Bytes past 64 KiB are
    /// ignored.
    pub fn load_rom(&mut self, rom: &[u8]) {
        let len = rom.len().min(MEMORY_SIZE);
        if len < rom.len() {
            log::warn!(
                "ROM is {} bytes; only the first {} are mapped",
                rom.len(),
                MEMORY_SIZE
            );
        }
        self.memory[..len].copy_from_slice(&rom[..len]);
    }

    /// Copy `bytes` into memory starting at `addr`, wrapping at 64 KiB.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        for (offset, &byte) in bytes.iter().enumerate() {
            let target = addr.wrapping_add(offset as u16);
            self.memory[target as usize] = byte;
        }
    }

    pub fn serial_output(&self) -> &[u8] {
        &self.serial
    }

    /// Number of non-sequential PC changes reported by the CPU.
    pub fn pc_changes(&self) -> u64 {
        self.pc_changes
    }

    /// Interrupt lines acknowledged so far, oldest first.
    pub fn acknowledged(&self) -> &[u8] {
        &self.acknowledged
    }
}

impl Bus for FlatBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
        if addr == SC && value == 0x81 {
            let byte = self.memory[SB as usize];
            self.serial.push(byte);
            // Transfer completes immediately.
            self.memory[SC as usize] = value & 0x7F;
        }
    }

    fn acknowledge_interrupt(&mut self, line: u8) -> i32 {
        self.acknowledged.push(line);
        0
    }

    fn pc_changed(&mut self, _pc: u16) {
        self.pc_changes += 1;
    }
}
