use super::RamTarget;
use crate::machine::state::{StateSync, SyncState};

/// MBC5: 9-bit ROM bank (bank 0 is selectable in the upper window) and
/// 4-bit RAM bank. Rumble boards use RAM bank bit 3 for the motor.
pub(in super::super) struct Mbc5 {
    rom_bank: u16,
    ram_bank: u8,
    ram_enable: bool,
    rumble: bool,
}

impl Mbc5 {
    pub(super) fn new(rumble: bool) -> Self {
        Self {
            rom_bank: 1,
            ram_bank: 0,
            ram_enable: false,
            rumble,
        }
    }

    pub(super) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enable = value & 0x0F == 0x0A,
            0x2000..=0x2FFF => self.rom_bank = (self.rom_bank & 0x100) | u16::from(value),
            0x3000..=0x3FFF => {
                self.rom_bank = (self.rom_bank & 0xFF) | (u16::from(value & 0x01) << 8)
            }
            0x4000..=0x5FFF => {
                let mask = if self.rumble { 0x07 } else { 0x0F };
                self.ram_bank = value & mask;
            }
            _ => {}
        }
    }

    pub(super) fn rom_bank_high(&self) -> usize {
        usize::from(self.rom_bank)
    }

    pub(super) fn ram_target(&self) -> RamTarget {
        if self.ram_enable {
            RamTarget::Ram(usize::from(self.ram_bank))
        } else {
            RamTarget::Disabled
        }
    }
}

impl SyncState for Mbc5 {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_u16(&mut self.rom_bank);
        s.sync_u8(&mut self.ram_bank);
        s.sync_bool(&mut self.ram_enable);
    }
}
