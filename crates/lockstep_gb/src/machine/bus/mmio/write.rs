use super::super::GameBoyBus;

impl GameBoyBus {
    /// Resolve a CPU write with region side effects but no hooks and no
    /// bus time.
    pub(crate) fn write_mapped(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => {
                let now = self.cycles;
                if let Some(cart) = self.cartridge.as_mut() {
                    cart.write_rom(addr, value, now);
                }
            }
            0x8000..=0x9FFF => self.ppu.write_vram(addr, value),
            0xA000..=0xBFFF => {
                let now = self.cycles;
                if let Some(cart) = self.cartridge.as_mut() {
                    cart.write_ram(addr, value, now);
                }
            }
            0xC000..=0xFDFF => {
                let offset = self.wram_offset(addr);
                self.wram[offset] = value;
            }
            0xFE00..=0xFE9F => self.ppu.write_oam(addr, value),
            0xFEA0..=0xFEFF => {}
            0xFF00..=0xFF7F => self.write_io(addr, value),
            0xFF80..=0xFFFE => self.hram[usize::from(addr - 0xFF80)] = value,
            0xFFFF => self.ie_reg = value,
        }
    }

    fn write_io(&mut self, addr: u16, value: u8) {
        let cgb = self.cgb();
        match addr {
            0xFF00 => self.write_joyp(value),
            0xFF01 => self.serial.write_sb(value),
            0xFF02 => self.serial.write_sc(value, cgb),
            0xFF04 => self.timer.write_div(),
            0xFF05 => self.timer.write_tima(value),
            0xFF06 => self.timer.write_tma(value),
            0xFF07 => self.timer.write_tac(value),
            0xFF0F => self.if_reg = value & 0x1F,
            0xFF10..=0xFF3F => self.apu.write(addr, value),
            0xFF46 => self.do_oam_dma(value),
            0xFF40..=0xFF4B | 0xFF4F | 0xFF68..=0xFF6B => {
                self.ppu.write_register(addr, value, &mut self.if_reg)
            }
            0xFF4D if cgb => self.key1_armed = value & 0x01 != 0,
            0xFF50 => {
                if self.bios_mapped {
                    log::info!("boot ROM unmapped");
                }
                self.bios_mapped = false;
            }
            0xFF51..=0xFF55 if cgb => self.write_hdma(addr, value),
            0xFF70 if cgb => self.wram_bank = (value & 0x07).max(1),
            _ => {}
        }
    }
}
