use super::state::{StateSync, SyncState};

pub(super) const SERIAL_IRQ: u8 = 0x08;

/// CPU cycles per bit on the slow internal clock (8192 Hz).
const SLOW_BIT_CYCLES: u32 = 512;
/// CGB fast clock (SC bit 1), 32x faster.
const FAST_BIT_CYCLES: u32 = 16;

/// Link port: SB shift register and SC control.
///
/// With no partner attached every bit shifted in is 1, so an internally
/// clocked transfer leaves SB at 0xFF. The host can play the partner
/// through `link_status`.
#[derive(Default)]
pub(crate) struct Serial {
    pub(crate) sb: u8,
    pub(crate) sc: u8,
    /// CPU cycles until the running internal-clock transfer completes.
    countdown: u32,
    /// Byte that was last clocked out, for the host to forward.
    out_byte: u8,
    /// Set when a byte was clocked out and the host has not acknowledged it.
    pending: bool,
}

impl Serial {
    pub(super) fn reset(&mut self, cgb: bool) {
        *self = Self::default();
        self.sc = if cgb { 0x7F } else { 0x7E };
    }

    pub(super) fn read_sc(&self, cgb: bool) -> u8 {
        if cgb {
            self.sc | 0x7C
        } else {
            self.sc | 0x7E
        }
    }

    pub(super) fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    pub(super) fn write_sc(&mut self, value: u8, cgb: bool) {
        self.sc = value;
        if value & 0x81 == 0x81 {
            let per_bit = if cgb && value & 0x02 != 0 {
                FAST_BIT_CYCLES
            } else {
                SLOW_BIT_CYCLES
            };
            self.countdown = per_bit * 8;
        } else {
            self.countdown = 0;
        }
    }

    /// Advance an internal-clock transfer by `cycles` CPU cycles. Returns
    /// `true` on the cycle the transfer completes.
    pub(super) fn tick(&mut self, cycles: u32, if_reg: &mut u8) -> bool {
        if self.countdown == 0 {
            return false;
        }
        if cycles < self.countdown {
            self.countdown -= cycles;
            return false;
        }
        self.countdown = 0;
        self.out_byte = self.sb;
        self.pending = true;
        self.sb = 0xFF;
        self.sc &= 0x7F;
        *if_reg |= SERIAL_IRQ;
        log::trace!("serial byte out 0x{:02X}", self.out_byte);
        true
    }

    /// Host-side view of the link port.
    ///
    /// - 256: 1 if a byte was clocked out since the last acknowledge
    /// - 257: acknowledge
    /// - 258: the byte last clocked out
    /// - 259: 1 if SC has a transfer in progress
    /// - 0..=255: shift this byte in as the partner, completing a transfer;
    ///   ignored while no transfer is in progress
    ///
    /// Returns -1 for values above 259.
    pub(super) fn link_status(&mut self, which: u32, if_reg: &mut u8) -> i32 {
        match which {
            256 => i32::from(self.pending),
            257 => {
                self.pending = false;
                0
            }
            258 => i32::from(self.out_byte),
            259 => i32::from(self.sc & 0x80 != 0),
            // Without a transfer in flight there is nothing to shift into.
            0..=255 if self.sc & 0x80 == 0 => 0,
            0..=255 => {
                self.out_byte = self.sb;
                self.pending = true;
                self.sb = which as u8;
                self.sc &= 0x7F;
                self.countdown = 0;
                *if_reg |= SERIAL_IRQ;
                0
            }
            _ => -1,
        }
    }
}

impl SyncState for Serial {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_u8(&mut self.sb);
        s.sync_u8(&mut self.sc);
        s.sync_u32(&mut self.countdown);
        s.sync_u8(&mut self.out_byte);
        s.sync_bool(&mut self.pending);
    }
}
