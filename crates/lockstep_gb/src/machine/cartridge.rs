mod header;
mod huc1;
mod mbc1;
mod mbc2;
mod mbc3;
mod mbc5;
mod multicart;
mod rtc;

pub(crate) use header::{CartInfo, MapperKind};
pub use multicart::MulticartDetector;
pub(crate) use multicart::LogoDetector;
pub(crate) use rtc::{Rtc, RTC_FOOTER_LEN};
pub use rtc::{RtcRegisters, TimeMode};

use huc1::HuC1;
use mbc1::Mbc1;
use mbc2::Mbc2;
use mbc3::{Mbc3, Mbc3Event};
use mbc5::Mbc5;

use super::state::{StateSync, SyncState};
use crate::StateError;

const ROM_BANK_SIZE: usize = 0x4000;
const RAM_BANK_SIZE: usize = 0x2000;
const MBC30_MIN_ROM: usize = 0x20_0000;

/// Where the A000-BFFF window currently points.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum RamTarget {
    Disabled,
    /// Cartridge RAM bank (taken modulo the bank count).
    Ram(usize),
    /// MBC2 built-in RAM: 512 4-bit cells, mirrored.
    Nibbles,
    /// RTC register 0..=4.
    Rtc(u8),
    Infrared,
}

pub(super) enum Mapper {
    RomOnly,
    Mbc1(Mbc1),
    Mbc2(Mbc2),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
    HuC1(HuC1),
}

impl Mapper {
    fn power_on(info: &CartInfo, rom_len: usize, multicart: bool) -> Self {
        match info.mapper {
            MapperKind::RomOnly => Mapper::RomOnly,
            MapperKind::Mbc1 => Mapper::Mbc1(Mbc1::new(multicart)),
            MapperKind::Mbc2 => Mapper::Mbc2(Mbc2::new()),
            MapperKind::Mbc3 => Mapper::Mbc3(Mbc3::new(rom_len > MBC30_MIN_ROM, info.rtc)),
            MapperKind::Mbc5 => Mapper::Mbc5(Mbc5::new(info.rumble)),
            MapperKind::HuC1 => Mapper::HuC1(HuC1::new()),
        }
    }
}

/// Loaded cartridge: ROM image, battery RAM, mapper registers and clock.
pub(crate) struct Cartridge {
    rom: Vec<u8>,
    ram: Vec<u8>,
    pub(crate) info: CartInfo,
    mapper: Mapper,
    pub(crate) rtc: Option<Rtc>,
    multicart: bool,
    /// Last value driven on the cartridge bus and when (CPU cycles).
    bus_value: u8,
    bus_cycle: u64,
    pub(crate) pull_up_time: u32,
}

impl Cartridge {
    pub(crate) fn new(rom: &[u8], info: CartInfo, multicart: bool) -> Self {
        // Pad to whole banks, at least the two banks of a 32 KiB image.
        let banks = rom.len().div_ceil(ROM_BANK_SIZE).max(2);
        let mut image = rom.to_vec();
        image.resize(banks * ROM_BANK_SIZE, 0xFF);

        let mapper = Mapper::power_on(&info, image.len(), multicart);

        log::info!(
            "cartridge \"{}\": {:?}, {} ROM banks, {} bytes RAM{}{}",
            info.title,
            info.mapper,
            banks,
            info.ram_size,
            if info.rtc { ", RTC" } else { "" },
            if multicart { ", multicart" } else { "" },
        );

        Self {
            rom: image,
            ram: vec![0xFF; info.ram_size],
            rtc: info.rtc.then(Rtc::new),
            info,
            mapper,
            multicart,
            bus_value: 0xFF,
            bus_cycle: 0,
            pull_up_time: 0,
        }
    }

    /// Put the mapper back into its power-on state. RAM and clock survive.
    pub(crate) fn reset(&mut self) {
        self.mapper = Mapper::power_on(&self.info, self.rom.len(), self.multicart);
        self.bus_value = 0xFF;
        self.bus_cycle = 0;
    }

    pub(crate) fn rom(&mut self) -> &mut [u8] {
        &mut self.rom
    }

    pub(crate) fn ram(&mut self) -> &mut [u8] {
        &mut self.ram
    }

    fn rom_bank_count(&self) -> usize {
        self.rom.len() / ROM_BANK_SIZE
    }

    /// ROM bank mapped at `addr` (0000-7FFF), already reduced modulo the
    /// bank count.
    pub(crate) fn rom_bank_at(&self, addr: u16) -> usize {
        let raw = if addr < 0x4000 {
            match &self.mapper {
                Mapper::Mbc1(m) => m.rom_bank_low(),
                _ => 0,
            }
        } else {
            match &self.mapper {
                Mapper::RomOnly => 1,
                Mapper::Mbc1(m) => m.rom_bank_high(),
                Mapper::Mbc2(m) => m.rom_bank_high(),
                Mapper::Mbc3(m) => m.rom_bank_high(),
                Mapper::Mbc5(m) => m.rom_bank_high(),
                Mapper::HuC1(m) => m.rom_bank_high(),
            }
        };
        raw % self.rom_bank_count()
    }

    /// Physical ROM offset for a CPU address in 0000-7FFF.
    pub(crate) fn rom_offset(&self, addr: u16) -> usize {
        self.rom_bank_at(addr) * ROM_BANK_SIZE + usize::from(addr & 0x3FFF)
    }

    fn ram_target(&self) -> RamTarget {
        match &self.mapper {
            Mapper::RomOnly if !self.ram.is_empty() => RamTarget::Ram(0),
            Mapper::RomOnly => RamTarget::Disabled,
            Mapper::Mbc1(m) => m.ram_target(),
            Mapper::Mbc2(m) => m.ram_target(),
            Mapper::Mbc3(m) => m.ram_target(),
            Mapper::Mbc5(m) => m.ram_target(),
            Mapper::HuC1(m) => m.ram_target(),
        }
    }

    /// Physical cart RAM offset for a CPU address in A000-BFFF, if the
    /// window currently maps RAM.
    pub(crate) fn ram_offset(&self, addr: u16) -> Option<usize> {
        if self.ram.is_empty() {
            return None;
        }
        let offset = match self.ram_target() {
            RamTarget::Ram(bank) => {
                let banks = self.ram.len().div_ceil(RAM_BANK_SIZE);
                (bank % banks) * RAM_BANK_SIZE + usize::from(addr & 0x1FFF)
            }
            RamTarget::Nibbles => usize::from(addr & 0x01FF),
            _ => return None,
        };
        Some(offset % self.ram.len())
    }

    fn drive_bus(&mut self, value: u8, now: u64) -> u8 {
        self.bus_value = value;
        self.bus_cycle = now;
        value
    }

    /// Open-bus value for an unmapped RAM window read.
    fn floating(&self, now: u64) -> u8 {
        if now.saturating_sub(self.bus_cycle) < u64::from(self.pull_up_time) {
            self.bus_value
        } else {
            0xFF
        }
    }

    pub(crate) fn read_rom(&mut self, addr: u16, now: u64) -> u8 {
        let value = self.rom[self.rom_offset(addr)];
        self.drive_bus(value, now)
    }

    pub(crate) fn write_rom(&mut self, addr: u16, value: u8, now: u64) {
        self.drive_bus(value, now);
        match &mut self.mapper {
            Mapper::RomOnly => {}
            Mapper::Mbc1(m) => m.write(addr, value),
            Mapper::Mbc2(m) => m.write(addr, value),
            Mapper::Mbc3(m) => {
                if let Mbc3Event::LatchWrite(v) = m.write(addr, value) {
                    if let Some(rtc) = self.rtc.as_mut() {
                        rtc.latch_write(v);
                    }
                }
            }
            Mapper::Mbc5(m) => m.write(addr, value),
            Mapper::HuC1(m) => m.write(addr, value),
        }
    }

    pub(crate) fn read_ram(&mut self, addr: u16, now: u64) -> u8 {
        let value = match self.ram_target() {
            RamTarget::Disabled => return self.floating(now),
            RamTarget::Infrared => 0xC0,
            RamTarget::Rtc(index) => match self.rtc.as_ref() {
                Some(rtc) => rtc.read(index),
                None => return self.floating(now),
            },
            RamTarget::Nibbles => match self.ram_offset(addr) {
                Some(offset) => self.ram[offset] | 0xF0,
                None => return self.floating(now),
            },
            RamTarget::Ram(_) => match self.ram_offset(addr) {
                Some(offset) => self.ram[offset],
                None => return self.floating(now),
            },
        };
        self.drive_bus(value, now)
    }

    pub(crate) fn write_ram(&mut self, addr: u16, value: u8, now: u64) {
        self.drive_bus(value, now);
        match self.ram_target() {
            RamTarget::Rtc(index) => {
                if let Some(rtc) = self.rtc.as_mut() {
                    rtc.write(index, value);
                }
            }
            RamTarget::Nibbles => {
                if let Some(offset) = self.ram_offset(addr) {
                    self.ram[offset] = value & 0x0F;
                }
            }
            RamTarget::Ram(_) => {
                if let Some(offset) = self.ram_offset(addr) {
                    self.ram[offset] = value;
                }
            }
            RamTarget::Disabled | RamTarget::Infrared => {}
        }
    }

    /// Advance the clock by real-time cycles.
    pub(crate) fn tick(&mut self, cycles: u32) {
        if let Some(rtc) = self.rtc.as_mut() {
            rtc.tick(cycles);
        }
    }

    fn rtc_in_save(&self, deterministic: bool) -> bool {
        !deterministic && self.rtc.is_some()
    }

    pub(crate) fn savedata_len(&self, deterministic: bool) -> usize {
        if !self.info.battery {
            return 0;
        }
        let footer = if self.rtc_in_save(deterministic) {
            RTC_FOOTER_LEN
        } else {
            0
        };
        self.ram.len() + footer
    }

    pub(crate) fn save_savedata(&mut self, deterministic: bool) -> Vec<u8> {
        if !self.info.battery {
            return Vec::new();
        }
        let mut out = self.ram.clone();
        if self.rtc_in_save(deterministic) {
            if let Some(rtc) = self.rtc.as_mut() {
                rtc.write_footer(&mut out);
            }
        }
        out
    }

    /// Copy battery RAM (and the clock footer when it applies) from a save.
    /// A short image fills what it covers.
    pub(crate) fn load_savedata(&mut self, data: &[u8], deterministic: bool) {
        if !self.info.battery {
            return;
        }
        let n = data.len().min(self.ram.len());
        self.ram[..n].copy_from_slice(&data[..n]);
        if self.rtc_in_save(deterministic) {
            if let (Some(rtc), Some(footer)) = (self.rtc.as_mut(), data.get(self.ram.len()..)) {
                rtc.read_footer(footer);
            }
        }
    }
}

impl SyncState for Cartridge {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        let mut kind = self.info.mapper as u8;
        s.sync_u8(&mut kind);
        if s.is_restoring() && kind != self.info.mapper as u8 {
            s.fail(StateError::LayoutMismatch);
            return;
        }
        s.sync_bytes(&mut self.ram);
        match &mut self.mapper {
            Mapper::RomOnly => {}
            Mapper::Mbc1(m) => m.sync_state(s),
            Mapper::Mbc2(m) => m.sync_state(s),
            Mapper::Mbc3(m) => m.sync_state(s),
            Mapper::Mbc5(m) => m.sync_state(s),
            Mapper::HuC1(m) => m.sync_state(s),
        }
        let mut has_rtc = self.rtc.is_some();
        s.sync_bool(&mut has_rtc);
        if s.is_restoring() && has_rtc != self.rtc.is_some() {
            s.fail(StateError::LayoutMismatch);
            return;
        }
        if let Some(rtc) = self.rtc.as_mut() {
            rtc.sync_state(s);
        }
        s.sync_u8(&mut self.bus_value);
        s.sync_u64(&mut self.bus_cycle);
    }
}
