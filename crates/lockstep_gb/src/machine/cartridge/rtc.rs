use std::time::{SystemTime, UNIX_EPOCH};

use crate::machine::state::{StateSync, SyncState};

/// Real-time cycles per RTC second before the divisor offset is applied.
const BASE_CYCLES_PER_SECOND: i64 = 4_194_304;

/// Size of the RTC footer appended to battery saves.
pub(crate) const RTC_FOOTER_LEN: usize = 48;

const DH_DAY_HIGH: u8 = 0x01;
const DH_HALT: u8 = 0x40;
const DH_CARRY: u8 = 0x80;

/// How the clock advances.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum TimeMode {
    /// Catch up to the host clock on every access.
    #[default]
    WallClock,
    /// Count emulated real-time cycles. Deterministic.
    Cycles,
}

/// The five MBC3 clock registers, in select order 0x08..=0x0C.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RtcRegisters {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day_low: u8,
    /// Bit 0: day bit 8, bit 6: halt, bit 7: day carry.
    pub day_high: u8,
}

impl RtcRegisters {
    fn get(&self, index: u8) -> u8 {
        match index {
            0 => self.seconds,
            1 => self.minutes,
            2 => self.hours,
            3 => self.day_low,
            _ => self.day_high,
        }
    }

    fn set(&mut self, index: u8, value: u8) {
        match index {
            0 => self.seconds = value & 0x3F,
            1 => self.minutes = value & 0x3F,
            2 => self.hours = value & 0x1F,
            3 => self.day_low = value,
            _ => self.day_high = value & (DH_CARRY | DH_HALT | DH_DAY_HIGH),
        }
    }

    fn days(&self) -> u16 {
        u16::from(self.day_low) | (u16::from(self.day_high & DH_DAY_HIGH) << 8)
    }

    fn set_days(&mut self, days: u16) {
        self.day_low = days as u8;
        self.day_high = (self.day_high & !DH_DAY_HIGH) | ((days >> 8) as u8 & DH_DAY_HIGH);
    }

    /// One-second tick. Out-of-range values written by software count up
    /// to their field width and wrap without carrying.
    fn tick_second(&mut self) {
        if self.seconds != 59 {
            self.seconds = (self.seconds + 1) & 0x3F;
            return;
        }
        self.seconds = 0;
        if self.minutes != 59 {
            self.minutes = (self.minutes + 1) & 0x3F;
            return;
        }
        self.minutes = 0;
        if self.hours != 23 {
            self.hours = (self.hours + 1) & 0x1F;
            return;
        }
        self.hours = 0;
        let days = self.days() + 1;
        if days > 0x1FF {
            self.day_high |= DH_CARRY;
        }
        self.set_days(days & 0x1FF);
    }

    fn advance_seconds(&mut self, seconds: u64) {
        if seconds < 60 * 60 {
            for _ in 0..seconds {
                self.tick_second();
            }
            return;
        }
        let total_secs = u64::from(self.seconds) + seconds;
        self.seconds = (total_secs % 60) as u8;
        let total_mins = u64::from(self.minutes) + total_secs / 60;
        self.minutes = (total_mins % 60) as u8;
        let total_hours = u64::from(self.hours) + total_mins / 60;
        self.hours = (total_hours % 24) as u8;
        let total_days = u64::from(self.days()) + total_hours / 24;
        if total_days > 0x1FF {
            self.day_high |= DH_CARRY;
        }
        self.set_days((total_days & 0x1FF) as u16);
    }
}

/// MBC3 real-time clock.
pub(crate) struct Rtc {
    live: RtcRegisters,
    latched: RtcRegisters,
    /// Real-time cycles into the current second (cycle mode).
    subsecond: u32,
    /// Host time of the last catch-up (wall-clock mode).
    last_sync: u64,
    last_latch_write: u8,
    mode: TimeMode,
    divisor_offset: i32,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl Rtc {
    pub(crate) fn new() -> Self {
        Self {
            live: RtcRegisters::default(),
            latched: RtcRegisters::default(),
            subsecond: 0,
            last_sync: unix_now(),
            last_latch_write: 0xFF,
            mode: TimeMode::WallClock,
            divisor_offset: 0,
        }
    }

    fn halted(&self) -> bool {
        self.live.day_high & DH_HALT != 0
    }

    fn cycles_per_second(&self) -> u32 {
        (BASE_CYCLES_PER_SECOND + i64::from(self.divisor_offset)).max(1) as u32
    }

    pub(crate) fn set_mode(&mut self, mode: TimeMode) {
        self.catch_up();
        self.mode = mode;
        self.last_sync = unix_now();
    }

    pub(crate) fn set_divisor_offset(&mut self, offset: i32) {
        self.divisor_offset = offset;
    }

    /// Advance by real-time cycles; only counts in cycle mode.
    pub(crate) fn tick(&mut self, cycles: u32) {
        if self.mode != TimeMode::Cycles || self.halted() {
            return;
        }
        let per_second = self.cycles_per_second();
        self.subsecond += cycles;
        while self.subsecond >= per_second {
            self.subsecond -= per_second;
            self.live.tick_second();
        }
    }

    fn catch_up(&mut self) {
        if self.mode != TimeMode::WallClock {
            return;
        }
        let now = unix_now();
        if !self.halted() && now > self.last_sync {
            self.live.advance_seconds(now - self.last_sync);
        }
        self.last_sync = now;
    }

    /// A write of 0 followed by 1 copies the live registers into the latch.
    pub(crate) fn latch_write(&mut self, value: u8) {
        if self.last_latch_write == 0 && value == 1 {
            self.catch_up();
            self.latched = self.live;
        }
        self.last_latch_write = value;
    }

    /// CPU-visible read: the latched snapshot.
    pub(crate) fn read(&self, index: u8) -> u8 {
        let value = self.latched.get(index);
        match index {
            0 | 1 => value | 0xC0,
            2 => value | 0xE0,
            4 => value | 0x3E,
            _ => value,
        }
    }

    pub(crate) fn write(&mut self, index: u8, value: u8) {
        self.catch_up();
        if index == 0 {
            self.subsecond = 0;
        }
        self.live.set(index, value);
    }

    /// `[dh, dl, h, m, s, c, dh_l, dl_l, h_l, m_l, s_l]`, where `c` is the
    /// sub-second cycle counter and the `_l` entries are the latched copy.
    pub(crate) fn registers(&mut self) -> [u32; 11] {
        self.catch_up();
        let l = &self.live;
        let h = &self.latched;
        [
            u32::from(l.day_high),
            u32::from(l.day_low),
            u32::from(l.hours),
            u32::from(l.minutes),
            u32::from(l.seconds),
            self.subsecond,
            u32::from(h.day_high),
            u32::from(h.day_low),
            u32::from(h.hours),
            u32::from(h.minutes),
            u32::from(h.seconds),
        ]
    }

    pub(crate) fn set_registers(&mut self, regs: &[u32; 11]) {
        for (index, &value) in [4u8, 3, 2, 1, 0].iter().zip(&regs[0..5]) {
            self.live.set(*index, value as u8);
        }
        self.subsecond = regs[5] % self.cycles_per_second();
        for (index, &value) in [4u8, 3, 2, 1, 0].iter().zip(&regs[6..11]) {
            self.latched.set(*index, value as u8);
        }
        self.last_sync = unix_now();
    }

    /// Battery footer: live then latched registers as u32 each, then the
    /// host time of the save as u64, all little-endian.
    pub(crate) fn write_footer(&mut self, out: &mut Vec<u8>) {
        self.catch_up();
        for regs in [self.live, self.latched] {
            for index in 0..5 {
                out.extend_from_slice(&u32::from(regs.get(index)).to_le_bytes());
            }
        }
        out.extend_from_slice(&self.last_sync.to_le_bytes());
    }

    pub(crate) fn read_footer(&mut self, footer: &[u8]) {
        if footer.len() < RTC_FOOTER_LEN {
            return;
        }
        let word = |i: usize| {
            let mut b = [0u8; 4];
            b.copy_from_slice(&footer[i * 4..i * 4 + 4]);
            u32::from_le_bytes(b) as u8
        };
        for index in 0..5u8 {
            self.live.set(index, word(usize::from(index)));
            self.latched.set(index, word(5 + usize::from(index)));
        }
        let mut stamp = [0u8; 8];
        stamp.copy_from_slice(&footer[40..48]);
        self.last_sync = u64::from_le_bytes(stamp);
        self.subsecond = 0;
        self.catch_up();
    }
}

impl SyncState for RtcRegisters {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_u8(&mut self.seconds);
        s.sync_u8(&mut self.minutes);
        s.sync_u8(&mut self.hours);
        s.sync_u8(&mut self.day_low);
        s.sync_u8(&mut self.day_high);
    }
}

impl SyncState for Rtc {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        if !s.is_restoring() {
            self.catch_up();
        }
        self.live.sync_state(s);
        self.latched.sync_state(s);
        s.sync_u32(&mut self.subsecond);
        s.sync_u64(&mut self.last_sync);
        s.sync_u8(&mut self.last_latch_write);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_rollover_carries_into_days() {
        let mut regs = RtcRegisters {
            seconds: 59,
            minutes: 59,
            hours: 23,
            day_low: 0xFF,
            day_high: 0x01,
        };
        regs.tick_second();
        assert_eq!(regs.seconds, 0);
        assert_eq!(regs.minutes, 0);
        assert_eq!(regs.hours, 0);
        assert_eq!(regs.days(), 0);
        assert_ne!(regs.day_high & DH_CARRY, 0);
    }

    #[test]
    fn out_of_range_seconds_wrap_without_carry() {
        let mut regs = RtcRegisters {
            seconds: 63,
            ..RtcRegisters::default()
        };
        regs.tick_second();
        assert_eq!(regs.seconds, 0);
        assert_eq!(regs.minutes, 0);
    }

    #[test]
    fn bulk_advance_matches_single_steps() {
        let start = RtcRegisters {
            seconds: 12,
            minutes: 34,
            hours: 5,
            day_low: 6,
            day_high: 0,
        };
        let mut stepped = start;
        for _ in 0..5000 {
            stepped.tick_second();
        }
        let mut bulk = start;
        bulk.advance_seconds(5000);
        assert_eq!(stepped, bulk);
    }

    #[test]
    fn cycle_mode_counts_emulated_seconds() {
        let mut rtc = Rtc::new();
        rtc.set_mode(TimeMode::Cycles);
        rtc.tick(4_194_304 * 3 + 10);
        rtc.latch_write(0);
        rtc.latch_write(1);
        assert_eq!(rtc.read(0) & 0x3F, 3);
    }

    #[test]
    fn register_writes_leave_the_latch_alone() {
        let mut rtc = Rtc::new();
        rtc.set_mode(TimeMode::Cycles);
        rtc.latch_write(0);
        rtc.latch_write(1);

        rtc.write(0, 42);
        assert_eq!(rtc.read(0), 0xC0);

        rtc.latch_write(0);
        rtc.latch_write(1);
        assert_eq!(rtc.read(0), 0xC0 | 42);
    }
}
