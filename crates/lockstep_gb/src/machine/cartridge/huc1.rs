use super::RamTarget;
use crate::machine::state::{StateSync, SyncState};

/// HuC1. Writing 0x0E to the enable register switches the RAM window to
/// the infrared port; no light is ever seen, so it reads 0xC0.
pub(in super::super) struct HuC1 {
    rom_bank: u8,
    ram_bank: u8,
    ram_enable: bool,
    infrared: bool,
}

impl HuC1 {
    pub(super) fn new() -> Self {
        Self {
            rom_bank: 1,
            ram_bank: 0,
            ram_enable: false,
            infrared: false,
        }
    }

    pub(super) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                self.infrared = value & 0x0F == 0x0E;
                self.ram_enable = !self.infrared;
            }
            0x2000..=0x3FFF => self.rom_bank = value & 0x3F,
            0x4000..=0x5FFF => self.ram_bank = value & 0x03,
            _ => {}
        }
    }

    pub(super) fn rom_bank_high(&self) -> usize {
        usize::from(self.rom_bank)
    }

    pub(super) fn ram_target(&self) -> RamTarget {
        if self.infrared {
            RamTarget::Infrared
        } else if self.ram_enable {
            RamTarget::Ram(usize::from(self.ram_bank))
        } else {
            RamTarget::Disabled
        }
    }
}

impl SyncState for HuC1 {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_u8(&mut self.rom_bank);
        s.sync_u8(&mut self.ram_bank);
        s.sync_bool(&mut self.ram_enable);
        s.sync_bool(&mut self.infrared);
    }
}
