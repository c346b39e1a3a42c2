use super::Cpu;

/// LR35902 register file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

/// Slot order used by [`Registers::to_array`] and [`Registers::from_array`].
///
/// `[pc, sp, a, b, c, d, e, f, h, l]`
pub const REGISTER_SLOTS: usize = 10;

impl Registers {
    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f & 0xF0])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        // Lower 4 bits of F are always zero.
        self.f = f & 0xF0;
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }

    pub fn to_array(&self) -> [u16; REGISTER_SLOTS] {
        [
            self.pc,
            self.sp,
            self.a as u16,
            self.b as u16,
            self.c as u16,
            self.d as u16,
            self.e as u16,
            (self.f & 0xF0) as u16,
            self.h as u16,
            self.l as u16,
        ]
    }

    /// Load every register from `[pc, sp, a, b, c, d, e, f, h, l]`.
    ///
    /// 8-bit slots keep their low byte; F keeps its upper nibble.
    pub fn from_array(values: &[u16; REGISTER_SLOTS]) -> Self {
        Self {
            pc: values[0],
            sp: values[1],
            a: values[2] as u8,
            b: values[3] as u8,
            c: values[4] as u8,
            d: values[5] as u8,
            e: values[6] as u8,
            f: values[7] as u8 & 0xF0,
            h: values[8] as u8,
            l: values[9] as u8,
        }
    }
}

/// Flag bits in the F register.
///
/// Layout (bit index in the byte, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
/// - bits 0–3 are always zero.
#[derive(Clone, Copy, Debug)]
pub enum Flag {
    Z = 7,
    N = 6,
    H = 5,
    C = 4,
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        let bit = flag as u8;
        (self.regs.f & (1 << bit)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let bit = flag as u8;
        if value {
            self.regs.f |= 1 << bit;
        } else {
            self.regs.f &= !(1 << bit);
        }
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f = 0;
    }
}
