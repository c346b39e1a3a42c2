use super::units::LengthCounter;
use crate::machine::state::{StateSync, SyncState};

/// Wave channel playing 32 4-bit samples from wave RAM.
#[derive(Clone)]
pub(super) struct Wave {
    pub(super) enabled: bool,
    dac: bool,
    level: u8,
    frequency: u16,
    timer: u32,
    position: u8,
    sample: u8,
    pub(super) length: LengthCounter,
    pub(super) ram: [u8; 16],
}

impl Wave {
    pub(super) fn new() -> Self {
        Self {
            enabled: false,
            dac: false,
            level: 0,
            frequency: 0,
            timer: 0,
            position: 0,
            sample: 0,
            length: LengthCounter::new(256),
            ram: [0; 16],
        }
    }

    fn period(&self) -> u32 {
        (2048 - u32::from(self.frequency)) * 2
    }

    pub(super) fn write(&mut self, reg: u16, value: u8) {
        match reg {
            0 => {
                self.dac = value & 0x80 != 0;
                if !self.dac {
                    self.enabled = false;
                }
            }
            1 => self.length.load(value),
            2 => self.level = (value >> 5) & 0x03,
            3 => self.frequency = (self.frequency & 0x700) | u16::from(value),
            _ => {
                self.frequency = (self.frequency & 0xFF) | (u16::from(value & 0x07) << 8);
                self.length.enabled = value & 0x40 != 0;
                if value & 0x80 != 0 {
                    self.enabled = self.dac;
                    self.length.trigger();
                    self.timer = self.period();
                    self.position = 0;
                }
            }
        }
    }

    pub(super) fn step(&mut self) {
        if self.timer > 1 {
            self.timer -= 1;
            return;
        }
        self.timer = self.period();
        self.position = (self.position + 1) & 31;
        let byte = self.ram[usize::from(self.position / 2)];
        self.sample = if self.position & 1 == 0 {
            byte >> 4
        } else {
            byte & 0x0F
        };
    }

    pub(super) fn length_tick(&mut self) {
        if self.length.tick() {
            self.enabled = false;
        }
    }

    pub(super) fn output(&self) -> u8 {
        if !self.enabled {
            return 0;
        }
        match self.level {
            0 => 0,
            1 => self.sample,
            2 => self.sample >> 1,
            _ => self.sample >> 2,
        }
    }

    pub(super) fn dac_enabled(&self) -> bool {
        self.dac
    }
}

impl SyncState for Wave {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_bool(&mut self.enabled);
        s.sync_bool(&mut self.dac);
        s.sync_u8(&mut self.level);
        s.sync_u16(&mut self.frequency);
        s.sync_u32(&mut self.timer);
        s.sync_u8(&mut self.position);
        self.frequency &= 0x7FF;
        self.position &= 31;
        s.sync_u8(&mut self.sample);
        self.length.sync_state(s);
        s.sync_bytes(&mut self.ram);
    }
}
