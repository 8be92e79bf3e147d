use super::cycles::CYCLES_CB;
use super::{Bus, Cpu, Flags};

impl Cpu {
    /// Handle CB-prefixed instructions (bit operations, shifts, and rotates).
    ///
    /// The second opcode byte splits into `x` (operation group), `y` (shift
    /// kind or bit number) and `z` (register index, 6 = (HL)).
    pub(super) fn step_cb<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let cb = self.fetch8(bus);
        let x = cb >> 6;
        let y = (cb >> 3) & 0x07;
        let z = cb & 0x07;

        match x {
            0 => {
                let value = self.read_reg8(bus, z);
                let result = self.shift_rotate(y, value);
                self.write_reg8(bus, z, result);
            }
            1 => {
                // BIT b, r: Z from the tested bit, N=0, H=1, C preserved.
                let value = self.read_reg8(bus, z);
                self.set_flag(Flags::Z, value & (1 << y) == 0);
                self.set_flag(Flags::N, false);
                self.set_flag(Flags::H, true);
            }
            2 => {
                // RES b, r
                let value = self.read_reg8(bus, z);
                self.write_reg8(bus, z, value & !(1 << y));
            }
            _ => {
                // SET b, r
                let value = self.read_reg8(bus, z);
                self.write_reg8(bus, z, value | (1 << y));
            }
        }

        CYCLES_CB[cb as usize] as u32
    }

    /// RLC, RRC, RL, RR, SLA, SRA, SWAP, SRL selected by `kind`.
    ///
    /// Z reflects the result, N and H are cleared and C receives the bit
    /// shifted out (always clear for SWAP).
    fn shift_rotate(&mut self, kind: u8, value: u8) -> u8 {
        let carry_in = u8::from(self.get_flag(Flags::C));
        let (result, carry) = match kind {
            // RLC r
            0 => (value.rotate_left(1), value & 0x80 != 0),
            // RRC r
            1 => (value.rotate_right(1), value & 0x01 != 0),
            // RL r
            2 => ((value << 1) | carry_in, value & 0x80 != 0),
            // RR r
            3 => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
            // SLA r
            4 => (value << 1, value & 0x80 != 0),
            // SRA r
            5 => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            // SWAP r
            6 => (value.rotate_left(4), false),
            // SRL r
            _ => (value >> 1, value & 0x01 != 0),
        };

        let mut f = Flags::empty();
        f.set(Flags::Z, result == 0);
        f.set(Flags::C, carry);
        self.regs.set_f(f);
        result
    }
}
