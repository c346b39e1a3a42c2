mod noise;
mod square;
mod units;
mod wave;

use noise::Noise;
use square::Square;
use wave::Wave;

use super::state::{StateSync, SyncState};

/// Real-time cycles between frame sequencer steps (512 Hz).
const FRAME_SEQUENCER_PERIOD: u32 = 8192;
/// One stereo sample every two real-time cycles.
const CYCLES_PER_SAMPLE: u8 = 2;
/// Per-channel output is scaled so four channels at full master volume
/// stay inside i16.
const MIX_SCALE: i32 = 64;

/// Bits that always read back as 1, FF10..=FF26.
const READ_MASKS: [u8; 0x17] = [
    0x80, 0x3F, 0x00, 0xFF, 0xBF, // NR10-NR14
    0xFF, 0x3F, 0x00, 0xFF, 0xBF, // unused, NR21-NR24
    0x7F, 0xFF, 0x9F, 0xFF, 0xBF, // NR30-NR34
    0xFF, 0xFF, 0x00, 0x00, 0xBF, // unused, NR41-NR44
    0x00, 0x00, 0x70, // NR50-NR52
];

/// Audio processing unit. Produces one packed stereo sample (left in the
/// low half, right in the high half, signed 16-bit each) per two real-time
/// cycles into an internal buffer that the coordinator drains.
pub(crate) struct Apu {
    powered: bool,
    ch1: Square,
    ch2: Square,
    ch3: Wave,
    ch4: Noise,
    /// Raw register bytes for read-back.
    regs: [u8; 0x17],
    frame_sequencer_timer: u32,
    frame_sequencer_step: u8,
    sample_phase: u8,
    pub(crate) samples: Vec<u32>,
}

impl Apu {
    pub(crate) fn new() -> Self {
        Self {
            powered: false,
            ch1: Square::new(true),
            ch2: Square::new(false),
            ch3: Wave::new(),
            ch4: Noise::new(),
            regs: [0; 0x17],
            frame_sequencer_timer: FRAME_SEQUENCER_PERIOD,
            frame_sequencer_step: 0,
            sample_phase: 0,
            samples: Vec::with_capacity(crate::SAMPLES_PER_FRAME + crate::MAX_OVERSHOOT_SAMPLES),
        }
    }

    /// Power-on state. After the boot ROM the APU is on, channel 1 has
    /// played the boot chime and the mixer routes everything.
    pub(crate) fn reset(&mut self, post_boot: bool) {
        let ram = self.ch3.ram;
        let samples = std::mem::take(&mut self.samples);
        *self = Self::new();
        self.samples = samples;
        self.samples.clear();
        self.ch3.ram = ram;
        if !post_boot {
            return;
        }
        self.write(0xFF26, 0x80);
        let boot_values: [(u16, u8); 20] = [
            (0xFF10, 0x80),
            (0xFF11, 0xBF),
            (0xFF12, 0xF3),
            (0xFF13, 0xFF),
            (0xFF14, 0x3F),
            (0xFF16, 0x3F),
            (0xFF17, 0x00),
            (0xFF18, 0xFF),
            (0xFF19, 0x3F),
            (0xFF1A, 0x7F),
            (0xFF1B, 0xFF),
            (0xFF1C, 0x9F),
            (0xFF1D, 0xFF),
            (0xFF1E, 0x3F),
            (0xFF20, 0xFF),
            (0xFF21, 0x00),
            (0xFF22, 0x00),
            (0xFF23, 0x3F),
            (0xFF24, 0x77),
            (0xFF25, 0xF3),
        ];
        for (addr, value) in boot_values {
            self.write(addr, value);
        }
        self.ch1.enabled = true;
    }

    fn nr52(&self) -> u8 {
        let mut value = 0x70;
        if self.powered {
            value |= 0x80;
        }
        for (bit, on) in [
            self.ch1.enabled,
            self.ch2.enabled,
            self.ch3.enabled,
            self.ch4.enabled,
        ]
        .into_iter()
        .enumerate()
        {
            if on {
                value |= 1 << bit;
            }
        }
        value
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF26 => self.nr52(),
            0xFF10..=0xFF25 => {
                let i = usize::from(addr - 0xFF10);
                self.regs[i] | READ_MASKS[i]
            }
            0xFF30..=0xFF3F => self.ch3.ram[usize::from(addr - 0xFF30)],
            _ => 0xFF,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF26 => self.write_nr52(value),
            0xFF30..=0xFF3F => self.ch3.ram[usize::from(addr - 0xFF30)] = value,
            // Everything else is read-only while powered off.
            _ if !self.powered => {}
            0xFF10..=0xFF25 => {
                self.regs[usize::from(addr - 0xFF10)] = value;
                match addr {
                    0xFF10..=0xFF14 => self.ch1.write(addr - 0xFF10, value),
                    0xFF16..=0xFF19 => self.ch2.write(addr - 0xFF15, value),
                    0xFF1A..=0xFF1E => self.ch3.write(addr - 0xFF1A, value),
                    0xFF20..=0xFF23 => self.ch4.write(addr - 0xFF1F, value),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn write_nr52(&mut self, value: u8) {
        let on = value & 0x80 != 0;
        if self.powered && !on {
            // Power-off clears every register; wave RAM survives.
            let ram = self.ch3.ram;
            self.ch1 = Square::new(true);
            self.ch2 = Square::new(false);
            self.ch3 = Wave::new();
            self.ch3.ram = ram;
            self.ch4 = Noise::new();
            self.regs = [0; 0x17];
        } else if !self.powered && on {
            self.frame_sequencer_timer = FRAME_SEQUENCER_PERIOD;
            self.frame_sequencer_step = 0;
        }
        self.powered = on;
    }

    /// Advance by `cycles` real-time cycles.
    pub(crate) fn tick(&mut self, cycles: u32) {
        for _ in 0..cycles {
            if self.powered {
                self.ch1.step();
                self.ch2.step();
                self.ch3.step();
                self.ch4.step();

                self.frame_sequencer_timer -= 1;
                if self.frame_sequencer_timer == 0 {
                    self.frame_sequencer_timer = FRAME_SEQUENCER_PERIOD;
                    self.step_frame_sequencer();
                }
            }

            self.sample_phase += 1;
            if self.sample_phase == CYCLES_PER_SAMPLE {
                self.sample_phase = 0;
                let sample = self.mix();
                self.samples.push(sample);
            }
        }
    }

    fn step_frame_sequencer(&mut self) {
        let step = self.frame_sequencer_step;
        if step % 2 == 0 {
            self.ch1.length_tick();
            self.ch2.length_tick();
            self.ch3.length_tick();
            self.ch4.length_tick();
        }
        if step == 2 || step == 6 {
            self.ch1.sweep_tick();
        }
        if step == 7 {
            self.ch1.envelope.tick();
            self.ch2.envelope.tick();
            self.ch4.envelope.tick();
        }
        self.frame_sequencer_step = (step + 1) & 7;
    }

    fn mix(&self) -> u32 {
        if !self.powered {
            return 0;
        }
        let nr50 = self.regs[0x14];
        let nr51 = self.regs[0x15];

        // A live DAC maps 0..=15 onto -15..=15; a dead one contributes 0.
        let analog = |dac: bool, digital: u8| -> i32 {
            if dac {
                i32::from(digital) * 2 - 15
            } else {
                0
            }
        };
        let outputs = [
            analog(self.ch1.dac_enabled(), self.ch1.output()),
            analog(self.ch2.dac_enabled(), self.ch2.output()),
            analog(self.ch3.dac_enabled(), self.ch3.output()),
            analog(self.ch4.dac_enabled(), self.ch4.output()),
        ];

        let mut left = 0;
        let mut right = 0;
        for (i, out) in outputs.iter().enumerate() {
            if nr51 & (0x10 << i) != 0 {
                left += out;
            }
            if nr51 & (0x01 << i) != 0 {
                right += out;
            }
        }
        let left_vol = i32::from((nr50 >> 4) & 0x07) + 1;
        let right_vol = i32::from(nr50 & 0x07) + 1;
        let left = (left * left_vol * MIX_SCALE) as i16;
        let right = (right * right_vol * MIX_SCALE) as i16;
        u32::from(left as u16) | (u32::from(right as u16) << 16)
    }
}

impl SyncState for Apu {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_bool(&mut self.powered);
        self.ch1.sync_state(s);
        self.ch2.sync_state(s);
        self.ch3.sync_state(s);
        self.ch4.sync_state(s);
        s.sync_bytes(&mut self.regs);
        s.sync_u32(&mut self.frame_sequencer_timer);
        s.sync_u8(&mut self.frame_sequencer_step);
        s.sync_u8(&mut self.sample_phase);
        if self.frame_sequencer_timer == 0 || self.frame_sequencer_timer > FRAME_SEQUENCER_PERIOD {
            self.frame_sequencer_timer = FRAME_SEQUENCER_PERIOD;
        }
        self.frame_sequencer_step &= 7;
        self.sample_phase %= CYCLES_PER_SAMPLE;
    }
}
