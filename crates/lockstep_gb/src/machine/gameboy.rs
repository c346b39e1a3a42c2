use bitflags::bitflags;

use crate::cpu::{BootRegisters, Cpu};
use crate::LoadError;

use super::bus::{CGB_BIOS_SIZE, DMG_BIOS_SIZE};
use super::cartridge::{CartInfo, Cartridge, LogoDetector, MapperKind, MulticartDetector};
use super::{GameBoyBus, GameBoyModel, TimeMode};

mod host;
mod inspect;
mod persist;
mod run;

pub use inspect::MemoryArea;

/// Header byte 0x143 value of a cartridge that only runs on CGB hardware.
const CGB_ONLY: u8 = 0xC0;

bitflags! {
    /// Options for [`GameBoy::load`].
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct LoadFlags: u32 {
        /// Emulate CGB hardware even for DMG cartridges.
        const CGB_MODE = 0x01;
        /// Use the register values the CGB boot ROM leaves on a GBA.
        const GBA_FLAG = 0x02;
        /// Allow the multicart detector to reinterpret MBC1 images.
        const MULTICART_COMPAT = 0x04;
        /// Skip the boot ROM even when one is loaded.
        const NO_BIOS = 0x08;
    }
}

/// High-level Game Boy machine.
///
/// Holds the CPU core and the bus plus the host settings that outlive a
/// cartridge swap. Time only moves inside [`GameBoy::run_for`].
pub struct GameBoy {
    pub(crate) cpu: Cpu,
    pub(crate) bus: GameBoyBus,
    flags: LoadFlags,
    multicart_detector: Box<dyn MulticartDetector>,
    time_mode: TimeMode,
    rtc_divisor_offset: i32,
    pull_up_time: u32,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: GameBoyBus::default(),
            flags: LoadFlags::empty(),
            multicart_detector: Box::new(LogoDetector),
            time_mode: TimeMode::default(),
            rtc_divisor_offset: 0,
            pull_up_time: 0,
        }
    }

    /// Insert a cartridge and power the machine on.
    ///
    /// On error the previously loaded cartridge, if any, stays in place.
    pub fn load(&mut self, rom: &[u8], flags: LoadFlags) -> Result<(), LoadError> {
        let info = CartInfo::parse(rom)?;
        let multicart = flags.contains(LoadFlags::MULTICART_COMPAT)
            && info.mapper == MapperKind::Mbc1
            && self.multicart_detector.is_multicart(rom);
        let cgb_only = rom[0x143] == CGB_ONLY;
        let model = self.select_model(info.cgb, cgb_only, flags);

        let mut cart = Cartridge::new(rom, info, multicart);
        cart.pull_up_time = self.pull_up_time;
        if let Some(rtc) = cart.rtc.as_mut() {
            rtc.set_mode(self.time_mode);
            rtc.set_divisor_offset(self.rtc_divisor_offset);
        }

        self.bus.model = model;
        self.bus.cartridge = Some(cart);
        self.flags = flags;
        self.reset();
        Ok(())
    }

    /// Supply a boot ROM: 256 bytes for DMG, 2304 bytes for CGB. It takes
    /// effect on the next [`load`](Self::load) or [`reset`](Self::reset).
    pub fn load_bios(&mut self, bios: &[u8]) -> Result<(), LoadError> {
        if bios.len() != DMG_BIOS_SIZE && bios.len() != CGB_BIOS_SIZE {
            return Err(LoadError::BiosMismatch(bios.len()));
        }
        self.bus.bios = Some(bios.to_vec());
        Ok(())
    }

    /// Power-cycle the machine. Cartridge RAM and the RTC survive.
    pub fn reset(&mut self) {
        let boot_rom = self.bios_for_model();
        self.bus.power_on(!boot_rom);

        if boot_rom {
            self.cpu.reset_for_bios();
        } else {
            let boot = match self.bus.model {
                GameBoyModel::Dmg => BootRegisters::Dmg,
                GameBoyModel::Cgb | GameBoyModel::CgbCompat
                    if self.flags.contains(LoadFlags::GBA_FLAG) =>
                {
                    BootRegisters::Gba
                }
                GameBoyModel::Cgb | GameBoyModel::CgbCompat => BootRegisters::Cgb,
            };
            self.cpu.reset(boot);
        }
        log::info!(
            "reset: {:?}, {}",
            self.bus.model,
            if boot_rom { "running boot ROM" } else { "post-boot state" }
        );
    }

    /// CGB hardware is used when asked for, when a CGB boot ROM is present,
    /// or when the cartridge refuses to run on anything else.
    fn select_model(&self, cart_cgb: bool, cgb_only: bool, flags: LoadFlags) -> GameBoyModel {
        let cgb_bios = self
            .bus
            .bios
            .as_ref()
            .is_some_and(|bios| bios.len() == CGB_BIOS_SIZE);
        let cgb_hardware = flags.contains(LoadFlags::CGB_MODE) || cgb_bios || cgb_only;
        match (cgb_hardware, cart_cgb) {
            (false, _) => GameBoyModel::Dmg,
            (true, true) => GameBoyModel::Cgb,
            (true, false) => GameBoyModel::CgbCompat,
        }
    }

    /// Whether the boot ROM should run on the next power-on.
    fn bios_for_model(&self) -> bool {
        if self.flags.contains(LoadFlags::NO_BIOS) {
            return false;
        }
        let Some(bios) = self.bus.bios.as_ref() else {
            return false;
        };
        let expected = match self.bus.model {
            GameBoyModel::Dmg => DMG_BIOS_SIZE,
            GameBoyModel::Cgb | GameBoyModel::CgbCompat => CGB_BIOS_SIZE,
        };
        if bios.len() != expected {
            log::warn!(
                "boot ROM of {} bytes does not fit {:?}; starting post-boot",
                bios.len(),
                self.bus.model
            );
            return false;
        }
        true
    }

    pub fn model(&self) -> GameBoyModel {
        self.bus.model
    }

    /// True on CGB hardware, including DMG compatibility mode.
    pub fn is_cgb(&self) -> bool {
        self.bus.model != GameBoyModel::Dmg
    }

    /// True when CGB hardware runs a DMG-only cartridge.
    pub fn is_cgb_dmg(&self) -> bool {
        self.bus.model == GameBoyModel::CgbCompat
    }

    pub fn is_loaded(&self) -> bool {
        self.bus.cartridge.is_some()
    }

    /// Title from the cartridge header, trailing padding removed.
    pub fn rom_title(&self) -> Option<&str> {
        self.bus.cartridge.as_ref().map(|cart| cart.info.title.as_str())
    }
}
