use super::units::{Envelope, LengthCounter, Sweep, SweepStep};
use crate::machine::state::{StateSync, SyncState};

const DUTY_PATTERNS: [u8; 4] = [0b0000_0001, 0b1000_0001, 0b1000_0111, 0b0111_1110];

/// Pulse channel. Channel 1 carries a frequency sweep, channel 2 does not.
#[derive(Clone)]
pub(super) struct Square {
    pub(super) enabled: bool,
    dac: bool,
    duty: u8,
    duty_step: u8,
    timer: u32,
    pub(super) frequency: u16,
    pub(super) length: LengthCounter,
    pub(super) envelope: Envelope,
    sweep: Option<Sweep>,
}

impl Square {
    pub(super) fn new(with_sweep: bool) -> Self {
        Self {
            enabled: false,
            dac: false,
            duty: 0,
            duty_step: 0,
            timer: 0,
            frequency: 0,
            length: LengthCounter::new(64),
            envelope: Envelope::default(),
            sweep: with_sweep.then(Sweep::default),
        }
    }

    fn period(&self) -> u32 {
        (2048 - u32::from(self.frequency)) * 4
    }

    /// Register write, `reg` being 0..=4 for NRx0..NRx4.
    pub(super) fn write(&mut self, reg: u16, value: u8) {
        match reg {
            0 => {
                if let Some(sweep) = self.sweep.as_mut() {
                    sweep.write(value);
                }
            }
            1 => {
                self.duty = value >> 6;
                self.length.load(value & 0x3F);
            }
            2 => {
                self.envelope.write(value);
                self.dac = value & 0xF8 != 0;
                if !self.dac {
                    self.enabled = false;
                }
            }
            3 => self.frequency = (self.frequency & 0x700) | u16::from(value),
            _ => {
                self.frequency = (self.frequency & 0xFF) | (u16::from(value & 0x07) << 8);
                self.length.enabled = value & 0x40 != 0;
                if value & 0x80 != 0 {
                    self.trigger();
                }
            }
        }
    }

    fn trigger(&mut self) {
        self.enabled = self.dac;
        self.length.trigger();
        self.envelope.trigger();
        self.timer = self.period();
        if let Some(sweep) = self.sweep.as_mut() {
            if !sweep.trigger(self.frequency) {
                self.enabled = false;
            }
        }
    }

    pub(super) fn step(&mut self) {
        if self.timer > 1 {
            self.timer -= 1;
            return;
        }
        self.timer = self.period();
        self.duty_step = (self.duty_step + 1) & 7;
    }

    pub(super) fn length_tick(&mut self) {
        if self.length.tick() {
            self.enabled = false;
        }
    }

    pub(super) fn sweep_tick(&mut self) {
        let Some(sweep) = self.sweep.as_mut() else {
            return;
        };
        match sweep.tick() {
            SweepStep::Retune(frequency) => self.frequency = frequency,
            SweepStep::Hold => {}
            SweepStep::Overflow => self.enabled = false,
        }
    }

    /// Digital output 0..=15.
    pub(super) fn output(&self) -> u8 {
        if !self.enabled {
            return 0;
        }
        let high = DUTY_PATTERNS[usize::from(self.duty)] >> (7 - self.duty_step) & 1 != 0;
        if high {
            self.envelope.volume
        } else {
            0
        }
    }

    pub(super) fn dac_enabled(&self) -> bool {
        self.dac
    }
}

impl SyncState for Square {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_bool(&mut self.enabled);
        s.sync_bool(&mut self.dac);
        s.sync_u8(&mut self.duty);
        self.duty &= 3;
        s.sync_u8(&mut self.duty_step);
        s.sync_u32(&mut self.timer);
        s.sync_u16(&mut self.frequency);
        self.frequency &= 0x7FF;
        self.length.sync_state(s);
        self.envelope.sync_state(s);
        if let Some(sweep) = self.sweep.as_mut() {
            sweep.sync_state(s);
        }
    }
}
