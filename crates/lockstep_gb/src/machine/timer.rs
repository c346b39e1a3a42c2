/// Divider and programmable timer.
///
/// The hidden system counter advances once per machine cycle (4 CPU
/// cycles); DIV exposes bits 13:6 of it. TIMA increments on the falling
/// edge of the counter bit selected by TAC, ANDed with the enable bit, so
/// DIV resets and TAC rewrites can produce extra increments. An overflow
/// leaves TIMA at zero for one machine cycle before the TMA reload and the
/// interrupt request.
mod io;

use super::state::{StateSync, SyncState};

pub(super) const TIMER_IRQ: u8 = 0x04;

pub(super) struct Timer {
    /// Hidden system counter, in machine cycles.
    pub(super) internal_counter: u16,
    pub(super) tima: u8,
    pub(super) tma: u8,
    /// Lower 3 bits meaningful.
    pub(super) tac: u8,
    /// TIMA overflowed on the previous machine cycle; the next one reloads.
    pub(super) overflow: bool,
    /// CPU cycles not yet folded into a whole machine cycle.
    subcycles: u8,
}

impl Timer {
    pub(super) fn new() -> Self {
        Self {
            internal_counter: 0,
            tima: 0,
            tma: 0,
            tac: 0,
            overflow: false,
            subcycles: 0,
        }
    }

    /// Post-boot state. The counter is seeded so that DIV reads 0xAB at
    /// PC=0x0100 on DMG.
    pub(super) fn init_post_boot(&mut self, cgb: bool) {
        self.internal_counter = if cgb { 0x0A00 } else { 0x2AC0 };
        self.tima = 0;
        self.tma = 0;
        self.tac = 0;
        self.overflow = false;
        self.subcycles = 0;
    }

    pub(super) fn init_for_bios(&mut self) {
        self.init_post_boot(false);
        self.internal_counter = 0;
    }

    #[inline]
    pub(super) fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// Currently selected counter bit:
    /// TAC 00 → bit 7, 01 → bit 1, 10 → bit 3, 11 → bit 5.
    #[inline]
    pub(super) fn counter_bit(&self) -> bool {
        let shift = match self.tac & 0x03 {
            0x00 => 7,
            0x01 => 1,
            0x02 => 3,
            _ => 5,
        };
        self.internal_counter & (1 << shift) != 0
    }

    #[inline]
    fn input_signal(&self) -> bool {
        self.enabled() && self.counter_bit()
    }

    fn increment_tima(&mut self) {
        let (next, overflow) = self.tima.overflowing_add(1);
        self.tima = next;
        if overflow {
            self.overflow = true;
        }
    }

    /// Advance by `cycles` CPU cycles.
    pub(super) fn tick(&mut self, cycles: u32, if_reg: &mut u8) {
        let total = u32::from(self.subcycles) + cycles;
        for _ in 0..total / 4 {
            self.tick_mcycle(if_reg);
        }
        self.subcycles = (total % 4) as u8;
    }

    pub(super) fn tick_mcycle(&mut self, if_reg: &mut u8) {
        if self.overflow {
            self.tima = self.tma;
            *if_reg |= TIMER_IRQ;
            self.overflow = false;
        }
        let before = self.input_signal();
        self.internal_counter = self.internal_counter.wrapping_add(1);
        if before && !self.input_signal() {
            self.increment_tima();
        }
    }
}

impl SyncState for Timer {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_u16(&mut self.internal_counter);
        s.sync_u8(&mut self.tima);
        s.sync_u8(&mut self.tma);
        s.sync_u8(&mut self.tac);
        self.tac &= 0x07;
        s.sync_bool(&mut self.overflow);
        s.sync_u8(&mut self.subcycles);
    }
}
