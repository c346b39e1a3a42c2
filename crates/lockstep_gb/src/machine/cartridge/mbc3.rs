use super::RamTarget;
use crate::machine::state::{StateSync, SyncState};

/// MBC3 banking registers. RTC register access and latching are routed
/// through here but the clock itself lives in [`super::rtc::Rtc`].
///
/// Images larger than 2 MiB are treated as MBC30, which decodes all eight
/// ROM bank bits and three RAM bank bits.
pub(in super::super) struct Mbc3 {
    rom_bank: u8,
    ram_select: u8,
    ram_enable: bool,
    mbc30: bool,
    has_rtc: bool,
}

/// Outcome of a register write the cartridge must act on.
pub(super) enum Mbc3Event {
    None,
    LatchWrite(u8),
}

impl Mbc3 {
    pub(super) fn new(mbc30: bool, has_rtc: bool) -> Self {
        Self {
            rom_bank: 1,
            ram_select: 0,
            ram_enable: false,
            mbc30,
            has_rtc,
        }
    }

    pub(super) fn write(&mut self, addr: u16, value: u8) -> Mbc3Event {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                let mask = if self.mbc30 { 0xFF } else { 0x7F };
                self.rom_bank = value & mask;
                if self.rom_bank == 0 {
                    self.rom_bank = 1;
                }
            }
            0x4000..=0x5FFF => self.ram_select = value & 0x0F,
            0x6000..=0x7FFF => return Mbc3Event::LatchWrite(value),
            _ => {}
        }
        Mbc3Event::None
    }

    pub(super) fn rom_bank_high(&self) -> usize {
        usize::from(self.rom_bank)
    }

    pub(super) fn ram_target(&self) -> RamTarget {
        if !self.ram_enable {
            return RamTarget::Disabled;
        }
        let ram_mask = if self.mbc30 { 0x07 } else { 0x03 };
        match self.ram_select {
            0x08..=0x0C if self.has_rtc => RamTarget::Rtc(self.ram_select - 0x08),
            sel if sel <= ram_mask => RamTarget::Ram(usize::from(sel)),
            _ => RamTarget::Disabled,
        }
    }
}

impl SyncState for Mbc3 {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_u8(&mut self.rom_bank);
        s.sync_u8(&mut self.ram_select);
        s.sync_bool(&mut self.ram_enable);
    }
}
