use super::GameBoy;
use crate::cpu::{Registers, REGISTER_SLOTS};
use crate::machine::bus::WRAM_BANK_SIZE;
use crate::machine::video::VRAM_BANK_SIZE;
use crate::machine::Breakpoint;

/// Memory regions exposed by [`GameBoy::memory_area`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MemoryArea {
    Vram,
    Rom,
    Wram,
    CartRam,
    Oam,
    Hram,
}

impl MemoryArea {
    /// Numbering used by front-ends: 0 = VRAM through 5 = HRAM.
    pub fn from_index(index: u32) -> Option<Self> {
        Some(match index {
            0 => MemoryArea::Vram,
            1 => MemoryArea::Rom,
            2 => MemoryArea::Wram,
            3 => MemoryArea::CartRam,
            4 => MemoryArea::Oam,
            5 => MemoryArea::Hram,
            _ => return None,
        })
    }
}

impl GameBoy {
    /// Direct view of a memory region, or `None` without a cartridge or
    /// when the cartridge has no RAM. VRAM and WRAM include the CGB banks
    /// only when CGB features are live.
    pub fn memory_area(&mut self, area: MemoryArea) -> Option<&mut [u8]> {
        let cgb = self.bus.cgb();
        let bus = &mut self.bus;
        let cart = bus.cartridge.as_mut()?;
        let region: &mut [u8] = match area {
            MemoryArea::Vram => {
                let len = if cgb { 2 * VRAM_BANK_SIZE } else { VRAM_BANK_SIZE };
                &mut bus.ppu.vram[..len]
            }
            MemoryArea::Rom => cart.rom(),
            MemoryArea::Wram => {
                let len = if cgb { 8 * WRAM_BANK_SIZE } else { 2 * WRAM_BANK_SIZE };
                &mut bus.wram[..len]
            }
            MemoryArea::CartRam => {
                let ram = cart.ram();
                if ram.is_empty() {
                    return None;
                }
                ram
            }
            MemoryArea::Oam => &mut bus.ppu.oam,
            MemoryArea::Hram => &mut bus.hram,
        };
        Some(region)
    }

    /// Read through the memory map with region side effects but without
    /// advancing time.
    pub fn external_read(&mut self, addr: u16) -> u8 {
        self.bus.external_read(addr)
    }

    pub fn external_write(&mut self, addr: u16, value: u8) {
        self.bus.external_write(addr, value);
    }

    /// Host side of the link port.
    ///
    /// - 256: 1 if a byte was clocked out since the last acknowledge
    /// - 257: acknowledge
    /// - 258: the byte last clocked out
    /// - 259: 1 while a transfer is in progress
    /// - 0..=255: shift this byte in as the partner; ignored while no
    ///   transfer is in progress
    ///
    /// Anything else returns -1.
    pub fn link_status(&mut self, which: u32) -> i32 {
        self.bus.serial.link_status(which, &mut self.bus.if_reg)
    }

    /// `[pc, sp, a, b, c, d, e, f, h, l]`. The low nibble of F reads 0.
    pub fn get_regs(&self) -> [u16; REGISTER_SLOTS] {
        self.cpu.regs.to_array()
    }

    pub fn set_regs(&mut self, regs: &[u16; REGISTER_SLOTS]) {
        self.cpu.regs = Registers::from_array(regs);
    }

    /// RTC registers as `[dh, dl, h, m, s, c, dh_l, dl_l, h_l, m_l, s_l]`;
    /// `None` when the cartridge has no clock.
    pub fn get_rtc_regs(&mut self) -> Option<[u32; 11]> {
        let rtc = self.bus.cartridge.as_mut()?.rtc.as_mut()?;
        Some(rtc.registers())
    }

    /// Returns `false` when the cartridge has no clock.
    pub fn set_rtc_regs(&mut self, regs: &[u32; 11]) -> bool {
        match self.bus.cartridge.as_mut().and_then(|c| c.rtc.as_mut()) {
            Some(rtc) => {
                rtc.set_registers(regs);
                true
            }
            None => false,
        }
    }

    /// Replace the breakpoint set. An empty slice removes all breakpoints.
    pub fn set_interrupt_addresses(&mut self, breakpoints: &[Breakpoint]) {
        self.bus.debugger.set_breakpoints(breakpoints);
    }

    pub fn interrupt_addresses(&self) -> &[Breakpoint] {
        self.bus.debugger.breakpoints()
    }

    /// Address of the breakpoint that stopped the last `run_for`.
    pub fn get_hit_interrupt_address(&self) -> Option<u16> {
        self.bus.debugger.hit()
    }
}
