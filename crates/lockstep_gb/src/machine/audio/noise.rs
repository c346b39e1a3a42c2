use super::units::{Envelope, LengthCounter};
use crate::machine::state::{StateSync, SyncState};

const DIVISORS: [u32; 8] = [8, 16, 32, 48, 64, 80, 96, 112];

/// Noise channel driven by a 15-bit (or 7-bit) LFSR.
#[derive(Clone)]
pub(super) struct Noise {
    pub(super) enabled: bool,
    dac: bool,
    shift: u8,
    narrow: bool,
    divisor: u8,
    timer: u32,
    lfsr: u16,
    pub(super) length: LengthCounter,
    pub(super) envelope: Envelope,
}

impl Noise {
    pub(super) fn new() -> Self {
        Self {
            enabled: false,
            dac: false,
            shift: 0,
            narrow: false,
            divisor: 0,
            timer: 0,
            lfsr: 0x7FFF,
            length: LengthCounter::new(64),
            envelope: Envelope::default(),
        }
    }

    fn period(&self) -> u32 {
        DIVISORS[usize::from(self.divisor)] << self.shift
    }

    pub(super) fn write(&mut self, reg: u16, value: u8) {
        match reg {
            1 => self.length.load(value & 0x3F),
            2 => {
                self.envelope.write(value);
                self.dac = value & 0xF8 != 0;
                if !self.dac {
                    self.enabled = false;
                }
            }
            3 => {
                self.shift = value >> 4;
                self.narrow = value & 0x08 != 0;
                self.divisor = value & 0x07;
            }
            4 => {
                self.length.enabled = value & 0x40 != 0;
                if value & 0x80 != 0 {
                    self.enabled = self.dac;
                    self.length.trigger();
                    self.envelope.trigger();
                    self.timer = self.period();
                    self.lfsr = 0x7FFF;
                }
            }
            _ => {}
        }
    }

    pub(super) fn step(&mut self) {
        if self.timer > 1 {
            self.timer -= 1;
            return;
        }
        self.timer = self.period();
        // Shifts 14 and 15 receive no clocks.
        if self.shift >= 14 {
            return;
        }
        let feedback = (self.lfsr ^ (self.lfsr >> 1)) & 1;
        self.lfsr = (self.lfsr >> 1) | (feedback << 14);
        if self.narrow {
            self.lfsr = (self.lfsr & !0x40) | (feedback << 6);
        }
    }

    pub(super) fn length_tick(&mut self) {
        if self.length.tick() {
            self.enabled = false;
        }
    }

    pub(super) fn output(&self) -> u8 {
        if self.enabled && self.lfsr & 1 == 0 {
            self.envelope.volume
        } else {
            0
        }
    }

    pub(super) fn dac_enabled(&self) -> bool {
        self.dac
    }
}

impl SyncState for Noise {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_bool(&mut self.enabled);
        s.sync_bool(&mut self.dac);
        s.sync_u8(&mut self.shift);
        s.sync_bool(&mut self.narrow);
        s.sync_u8(&mut self.divisor);
        self.shift &= 0x0F;
        self.divisor &= 0x07;
        s.sync_u32(&mut self.timer);
        s.sync_u16(&mut self.lfsr);
        self.length.sync_state(s);
        self.envelope.sync_state(s);
    }
}
