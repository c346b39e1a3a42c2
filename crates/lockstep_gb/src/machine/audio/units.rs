use crate::machine::state::{StateSync, SyncState};

/// Length counter, clocked at 256 Hz. Expiry silences the channel.
#[derive(Clone)]
pub(super) struct LengthCounter {
    pub(super) enabled: bool,
    counter: u16,
    max: u16,
}

impl LengthCounter {
    pub(super) fn new(max: u16) -> Self {
        Self {
            enabled: false,
            counter: 0,
            max,
        }
    }

    pub(super) fn load(&mut self, value: u8) {
        self.counter = self.max - (u16::from(value) & (self.max - 1));
    }

    /// Returns `true` when the counter runs out on this clock.
    pub(super) fn tick(&mut self) -> bool {
        if self.enabled && self.counter > 0 {
            self.counter -= 1;
            return self.counter == 0;
        }
        false
    }

    pub(super) fn trigger(&mut self) {
        if self.counter == 0 {
            self.counter = self.max;
        }
    }
}

impl SyncState for LengthCounter {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_bool(&mut self.enabled);
        s.sync_u16(&mut self.counter);
    }
}

/// Volume envelope, clocked at 64 Hz. Configured from NRx2.
#[derive(Clone, Default)]
pub(super) struct Envelope {
    pub(super) volume: u8,
    initial: u8,
    increase: bool,
    period: u8,
    timer: u8,
}

impl Envelope {
    pub(super) fn write(&mut self, nrx2: u8) {
        self.initial = nrx2 >> 4;
        self.increase = nrx2 & 0x08 != 0;
        self.period = nrx2 & 0x07;
    }

    pub(super) fn trigger(&mut self) {
        self.volume = self.initial;
        self.timer = self.period;
    }

    pub(super) fn tick(&mut self) {
        if self.period == 0 {
            return;
        }
        if self.timer > 0 {
            self.timer -= 1;
        }
        if self.timer == 0 {
            self.timer = self.period;
            if self.increase && self.volume < 0x0F {
                self.volume += 1;
            } else if !self.increase && self.volume > 0 {
                self.volume -= 1;
            }
        }
    }
}

impl SyncState for Envelope {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_u8(&mut self.volume);
        s.sync_u8(&mut self.initial);
        s.sync_bool(&mut self.increase);
        s.sync_u8(&mut self.period);
        s.sync_u8(&mut self.timer);
    }
}

pub(super) enum SweepStep {
    Hold,
    Retune(u16),
    /// The channel overflowed and must be disabled.
    Overflow,
}

/// Channel 1 frequency sweep, clocked at 128 Hz. Configured from NR10.
#[derive(Clone, Default)]
pub(super) struct Sweep {
    shadow: u16,
    timer: u8,
    enabled: bool,
    period: u8,
    negate: bool,
    shift: u8,
}

impl Sweep {
    pub(super) fn write(&mut self, nr10: u8) {
        self.period = (nr10 >> 4) & 0x07;
        self.negate = nr10 & 0x08 != 0;
        self.shift = nr10 & 0x07;
    }

    fn next_frequency(&self) -> u16 {
        let delta = self.shadow >> self.shift;
        if self.negate {
            self.shadow.wrapping_sub(delta)
        } else {
            self.shadow + delta
        }
    }

    fn reload_timer(&mut self) {
        self.timer = if self.period == 0 { 8 } else { self.period };
    }

    /// Trigger. Returns `false` when the overflow check kills the channel.
    pub(super) fn trigger(&mut self, frequency: u16) -> bool {
        self.shadow = frequency;
        self.reload_timer();
        self.enabled = self.period != 0 || self.shift != 0;
        !(self.shift != 0 && self.next_frequency() > 0x7FF)
    }

    pub(super) fn tick(&mut self) -> SweepStep {
        if self.timer > 0 {
            self.timer -= 1;
        }
        if self.timer != 0 {
            return SweepStep::Hold;
        }
        self.reload_timer();
        if !self.enabled || self.period == 0 {
            return SweepStep::Hold;
        }
        let next = self.next_frequency();
        if next > 0x7FF {
            return SweepStep::Overflow;
        }
        if self.shift == 0 {
            return SweepStep::Hold;
        }
        self.shadow = next;
        // The new value is checked again straight away.
        if self.next_frequency() > 0x7FF {
            return SweepStep::Overflow;
        }
        SweepStep::Retune(next)
    }
}

impl SyncState for Sweep {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_u16(&mut self.shadow);
        s.sync_u8(&mut self.timer);
        s.sync_bool(&mut self.enabled);
        s.sync_u8(&mut self.period);
        s.sync_bool(&mut self.negate);
        s.sync_u8(&mut self.shift);
        self.shift &= 0x07;
    }
}
