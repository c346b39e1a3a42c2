use super::super::GameBoyBus;

impl GameBoyBus {
    /// Resolve a CPU read with region side effects but no hooks and no bus
    /// time.
    pub(crate) fn read_mapped(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => {
                if let Some(value) = self.bios_covers(addr) {
                    return value;
                }
                let now = self.cycles;
                match self.cartridge.as_mut() {
                    Some(cart) => cart.read_rom(addr, now),
                    None => 0xFF,
                }
            }
            0x8000..=0x9FFF => self.ppu.read_vram(addr),
            0xA000..=0xBFFF => {
                let now = self.cycles;
                match self.cartridge.as_mut() {
                    Some(cart) => cart.read_ram(addr, now),
                    None => 0xFF,
                }
            }
            0xC000..=0xFDFF => self.wram[self.wram_offset(addr)],
            0xFE00..=0xFE9F => self.ppu.read_oam(addr),
            0xFEA0..=0xFEFF => 0xFF,
            0xFF00..=0xFF7F => self.read_io(addr),
            0xFF80..=0xFFFE => self.hram[usize::from(addr - 0xFF80)],
            0xFFFF => self.ie_reg,
        }
    }

    fn read_io(&mut self, addr: u16) -> u8 {
        let cgb = self.cgb();
        match addr {
            0xFF00 => self.read_joyp(),
            0xFF01 => self.serial.sb,
            0xFF02 => self.serial.read_sc(cgb),
            0xFF04 => self.timer.read_div(),
            0xFF05 => self.timer.read_tima(),
            0xFF06 => self.timer.read_tma(),
            0xFF07 => self.timer.read_tac(),
            0xFF0F => self.if_reg | 0xE0,
            0xFF10..=0xFF3F => self.apu.read(addr),
            0xFF46 => self.read_dma(),
            0xFF40..=0xFF4B | 0xFF4F | 0xFF68..=0xFF6B => self.ppu.read_register(addr),
            0xFF4D if cgb => 0x7E | (u8::from(self.double_speed) << 7) | u8::from(self.key1_armed),
            0xFF55 if cgb => self.read_hdma5(),
            0xFF70 if cgb => 0xF8 | self.wram_bank,
            _ => 0xFF,
        }
    }
}
