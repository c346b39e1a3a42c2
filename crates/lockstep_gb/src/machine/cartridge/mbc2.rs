use super::RamTarget;
use crate::machine::state::{StateSync, SyncState};

/// MBC2: 4-bit ROM bank and 512 half-bytes of built-in RAM.
///
/// Both registers live in 0000-3FFF; address bit 8 picks which one.
pub(in super::super) struct Mbc2 {
    rom_bank: u8,
    ram_enable: bool,
}

impl Mbc2 {
    pub(super) fn new() -> Self {
        Self {
            rom_bank: 1,
            ram_enable: false,
        }
    }

    pub(super) fn write(&mut self, addr: u16, value: u8) {
        if addr >= 0x4000 {
            return;
        }
        if addr & 0x0100 == 0 {
            self.ram_enable = value & 0x0F == 0x0A;
        } else {
            self.rom_bank = value & 0x0F;
            if self.rom_bank == 0 {
                self.rom_bank = 1;
            }
        }
    }

    pub(super) fn rom_bank_high(&self) -> usize {
        usize::from(self.rom_bank)
    }

    pub(super) fn ram_target(&self) -> RamTarget {
        if self.ram_enable {
            RamTarget::Nibbles
        } else {
            RamTarget::Disabled
        }
    }
}

impl SyncState for Mbc2 {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_u8(&mut self.rom_bank);
        s.sync_bool(&mut self.ram_enable);
    }
}
