use super::RamTarget;
use crate::machine::state::{StateSync, SyncState};

/// MBC1 banking registers.
///
/// BANK1 (2000-3FFF) holds five low ROM bank bits, BANK2 (4000-5FFF) two
/// high bits that either extend the ROM bank or select the RAM bank. In
/// mode 1 BANK2 also applies to the 0000-3FFF window and to RAM.
///
/// Multicart boards wire only four bits of BANK1, so BANK2 selects one of
/// four 256 KiB games.
pub(in super::super) struct Mbc1 {
    bank1: u8,
    bank2: u8,
    mode: bool,
    ram_enable: bool,
    multicart: bool,
}

impl Mbc1 {
    pub(super) fn new(multicart: bool) -> Self {
        Self {
            bank1: 1,
            bank2: 0,
            mode: false,
            ram_enable: false,
            multicart,
        }
    }

    fn high_shift(&self) -> u32 {
        if self.multicart {
            4
        } else {
            5
        }
    }

    pub(super) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                // The zero check sees all five bits even on multicarts.
                self.bank1 = value & 0x1F;
                if self.bank1 == 0 {
                    self.bank1 = 1;
                }
            }
            0x4000..=0x5FFF => self.bank2 = value & 0x03,
            0x6000..=0x7FFF => self.mode = value & 0x01 != 0,
            _ => {}
        }
    }

    pub(super) fn rom_bank_low(&self) -> usize {
        if self.mode {
            usize::from(self.bank2) << self.high_shift()
        } else {
            0
        }
    }

    pub(super) fn rom_bank_high(&self) -> usize {
        let low_mask = if self.multicart { 0x0F } else { 0x1F };
        (usize::from(self.bank2) << self.high_shift()) | usize::from(self.bank1 & low_mask)
    }

    pub(super) fn ram_target(&self) -> RamTarget {
        if !self.ram_enable {
            RamTarget::Disabled
        } else if self.mode && !self.multicart {
            RamTarget::Ram(usize::from(self.bank2))
        } else {
            RamTarget::Ram(0)
        }
    }
}

impl SyncState for Mbc1 {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_u8(&mut self.bank1);
        s.sync_u8(&mut self.bank2);
        s.sync_bool(&mut self.mode);
        s.sync_bool(&mut self.ram_enable);
    }
}
