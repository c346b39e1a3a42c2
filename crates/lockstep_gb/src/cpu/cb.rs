use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Execute a CB-prefixed instruction (rotates, shifts, BIT/RES/SET).
    pub(super) fn step_cb<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let cb = self.fetch8(bus);
        let y = (cb >> 3) & 0x07;
        let z = cb & 0x07;
        let value = self.read_reg8(bus, z);
        let memory = z == 6;

        match cb >> 6 {
            0 => {
                let result = self.shift_op(y, value);
                self.write_reg8(bus, z, result);
                if memory {
                    16
                } else {
                    8
                }
            }
            1 => {
                // BIT b, r: C preserved.
                let carry = self.get_flag(Flag::C);
                self.set_flags(value & (1 << y) == 0, false, true, carry);
                if memory {
                    12
                } else {
                    8
                }
            }
            2 => {
                self.write_reg8(bus, z, value & !(1 << y));
                if memory {
                    16
                } else {
                    8
                }
            }
            _ => {
                self.write_reg8(bus, z, value | (1 << y));
                if memory {
                    16
                } else {
                    8
                }
            }
        }
    }

    /// RLC/RRC/RL/RR/SLA/SRA/SWAP/SRL selected by `y`.
    fn shift_op(&mut self, y: u8, value: u8) -> u8 {
        let carry_in = self.get_flag(Flag::C) as u8;
        let (result, carry_out) = match y {
            0 => (value.rotate_left(1), value & 0x80 != 0),
            1 => (value.rotate_right(1), value & 0x01 != 0),
            2 => ((value << 1) | carry_in, value & 0x80 != 0),
            3 => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
            4 => (value << 1, value & 0x80 != 0),
            5 => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            6 => (value.rotate_left(4), false),
            _ => (value >> 1, value & 0x01 != 0),
        };
        self.set_flags(result == 0, false, false, carry_out);
        result
    }
}
