use super::{
    audio::Apu,
    cartridge::Cartridge,
    debug::Debugger,
    hooks::{Buttons, Hooks},
    serial::Serial,
    timer::Timer,
    video::Ppu,
    GameBoyModel,
};

mod clock;
mod dma;
mod init;
mod joypad;
mod mmio;
mod sync;
mod traits;

pub(crate) use dma::Hdma;

pub(crate) const WRAM_BANK_SIZE: usize = 0x1000;
pub(crate) const HRAM_SIZE: usize = 0x7F;

/// DMG boot ROM covers 0000-00FF; the CGB one adds 0200-08FF.
pub(crate) const DMG_BIOS_SIZE: usize = 0x100;
pub(crate) const CGB_BIOS_SIZE: usize = 0x900;

pub(crate) const JOYPAD_IRQ: u8 = 0x10;

/// Everything on the CPU's side of the bus: memories, I/O units, the
/// cartridge, host hooks and the time base that drives them.
pub(crate) struct GameBoyBus {
    pub(crate) model: GameBoyModel,
    pub(crate) cartridge: Option<Cartridge>,
    pub(crate) bios: Option<Vec<u8>>,
    /// Boot ROM overlays the cartridge until FF50 is written.
    pub(crate) bios_mapped: bool,

    pub(crate) wram: Vec<u8>,
    /// SVBK; always 1..=7.
    wram_bank: u8,
    pub(crate) hram: [u8; HRAM_SIZE],
    pub(crate) if_reg: u8,
    pub(crate) ie_reg: u8,

    pub(crate) ppu: Ppu,
    pub(crate) apu: Apu,
    timer: Timer,
    pub(crate) serial: Serial,

    /// P1 bits 4-5 as last written.
    joyp_select: u8,
    buttons: Buttons,
    dma_reg: u8,
    hdma: Hdma,

    double_speed: bool,
    key1_armed: bool,
    /// CPU cycle left over when halving for double speed.
    speed_subcycle: u8,
    /// CPU cycles of DMA stall to apply after the current instruction.
    stall_cycles: u32,
    /// Speed-switch pause; the timer does not run during it.
    speed_switch_pause: u32,

    /// CPU cycles since power-on.
    pub(crate) cycles: u64,
    /// CPU cycles since the current `run_for` started. Hook offsets.
    pub(crate) run_cycles: u64,
    /// CPU cycles spent on memory accesses in the current instruction.
    access_cycles: u32,
    /// Sample index of the last frame completed in this `run_for`.
    pub(crate) frame_sample: Option<usize>,

    pub(crate) hooks: Hooks,
    pub(crate) debugger: Debugger,
    pub(crate) external_hooks: bool,
}

impl Default for GameBoyBus {
    fn default() -> Self {
        let mut bus = Self {
            model: GameBoyModel::Dmg,
            cartridge: None,
            bios: None,
            bios_mapped: false,
            wram: vec![0; WRAM_BANK_SIZE * 8],
            wram_bank: 1,
            hram: [0; HRAM_SIZE],
            if_reg: 0,
            ie_reg: 0,
            ppu: Ppu::new(),
            apu: Apu::new(),
            timer: Timer::new(),
            serial: Serial::default(),
            joyp_select: 0x30,
            buttons: Buttons::empty(),
            dma_reg: 0xFF,
            hdma: Hdma::default(),
            double_speed: false,
            key1_armed: false,
            speed_subcycle: 0,
            stall_cycles: 0,
            speed_switch_pause: 0,
            cycles: 0,
            run_cycles: 0,
            access_cycles: 0,
            frame_sample: None,
            hooks: Hooks::default(),
            debugger: Debugger::default(),
            external_hooks: false,
        };
        bus.power_on(false);
        bus
    }
}

impl GameBoyBus {
    pub(crate) fn cgb(&self) -> bool {
        self.model.cgb_features()
    }

    /// ROM bank the CPU sees at `addr`, for breakpoint matching. Addresses
    /// outside the ROM windows report bank 0.
    pub(crate) fn active_bank(&self, addr: u16) -> u16 {
        match (&self.cartridge, addr) {
            (Some(cart), 0x0000..=0x7FFF) => cart.rom_bank_at(addr) as u16,
            _ => 0,
        }
    }

    pub(crate) fn wram_offset(&self, addr: u16) -> usize {
        let addr = if addr >= 0xE000 { addr - 0x2000 } else { addr };
        if addr < 0xD000 {
            usize::from(addr - 0xC000)
        } else {
            usize::from(self.wram_bank) * WRAM_BANK_SIZE + usize::from(addr - 0xD000)
        }
    }

    fn bios_covers(&self, addr: u16) -> Option<u8> {
        if !self.bios_mapped {
            return None;
        }
        let bios = self.bios.as_ref()?;
        let addr = usize::from(addr);
        let mapped = addr < DMG_BIOS_SIZE
            || (bios.len() == CGB_BIOS_SIZE && (0x200..CGB_BIOS_SIZE).contains(&addr));
        if mapped {
            bios.get(addr).copied()
        } else {
            None
        }
    }
}
