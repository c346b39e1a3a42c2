use super::{Ppu, VRAM_BANK_SIZE};

impl Ppu {
    pub(crate) fn read_register(&self, addr: u16) -> u8 {
        match addr {
            0xFF40 => self.lcdc,
            0xFF41 => {
                let coincidence = if self.lcd_enabled() && self.ly == self.lyc {
                    0x04
                } else {
                    0
                };
                0x80 | self.stat_select | coincidence | self.mode()
            }
            0xFF42 => self.scy,
            0xFF43 => self.scx,
            0xFF44 => self.ly,
            0xFF45 => self.lyc,
            0xFF47 => self.bgp,
            0xFF48 => self.obp0,
            0xFF49 => self.obp1,
            0xFF4A => self.wy,
            0xFF4B => self.wx,
            0xFF4F if self.cgb => 0xFE | self.vram_bank,
            0xFF68 if self.cgb => self.bcps | 0x40,
            0xFF69 if self.cgb => self.bg_palette_ram[usize::from(self.bcps & 0x3F)],
            0xFF6A if self.cgb => self.ocps | 0x40,
            0xFF6B if self.cgb => self.obj_palette_ram[usize::from(self.ocps & 0x3F)],
            _ => 0xFF,
        }
    }

    pub(crate) fn write_register(&mut self, addr: u16, value: u8, if_reg: &mut u8) {
        match addr {
            0xFF40 => {
                let was_on = self.lcd_enabled();
                self.lcdc = value;
                match (was_on, self.lcd_enabled()) {
                    (true, false) => self.lcd_off(),
                    (false, true) => self.lcd_on(if_reg),
                    _ => {}
                }
            }
            0xFF41 => {
                self.stat_select = value & 0x78;
                self.update_stat_line(if_reg);
            }
            0xFF42 => self.scy = value,
            0xFF43 => self.scx = value,
            // LY is read-only.
            0xFF44 => {}
            0xFF45 => {
                self.lyc = value;
                self.update_stat_line(if_reg);
            }
            0xFF47 => self.bgp = value,
            0xFF48 => self.obp0 = value,
            0xFF49 => self.obp1 = value,
            0xFF4A => self.wy = value,
            0xFF4B => self.wx = value,
            0xFF4F if self.cgb => self.vram_bank = value & 0x01,
            0xFF68 if self.cgb => self.bcps = value & 0xBF,
            0xFF69 if self.cgb => {
                self.bg_palette_ram[usize::from(self.bcps & 0x3F)] = value;
                self.bcps = auto_increment(self.bcps);
            }
            0xFF6A if self.cgb => self.ocps = value & 0xBF,
            0xFF6B if self.cgb => {
                self.obj_palette_ram[usize::from(self.ocps & 0x3F)] = value;
                self.ocps = auto_increment(self.ocps);
            }
            _ => {}
        }
    }

    fn vram_index(&self, addr: u16) -> usize {
        usize::from(self.vram_bank) * VRAM_BANK_SIZE + usize::from(addr & 0x1FFF)
    }

    /// CPU read of 8000-9FFF; blocked reads return 0xFF.
    pub(crate) fn read_vram(&self, addr: u16) -> u8 {
        if self.vram_accessible() {
            self.vram[self.vram_index(addr)]
        } else {
            0xFF
        }
    }

    pub(crate) fn write_vram(&mut self, addr: u16, value: u8) {
        if self.vram_accessible() {
            let index = self.vram_index(addr);
            self.vram[index] = value;
        }
    }

    /// Unchecked VRAM write into the current bank, for HDMA and host pokes.
    pub(crate) fn poke_vram(&mut self, addr: u16, value: u8) {
        let index = self.vram_index(addr);
        self.vram[index] = value;
    }

    pub(crate) fn read_oam(&self, addr: u16) -> u8 {
        if self.oam_accessible() {
            self.oam[usize::from(addr - 0xFE00)]
        } else {
            0xFF
        }
    }

    pub(crate) fn write_oam(&mut self, addr: u16, value: u8) {
        if self.oam_accessible() {
            self.oam[usize::from(addr - 0xFE00)] = value;
        }
    }
}

/// Palette index registers advance after a data write when bit 7 is set.
fn auto_increment(select: u8) -> u8 {
    if select & 0x80 != 0 {
        0x80 | (select.wrapping_add(1) & 0x3F)
    } else {
        select
    }
}
