use crate::LoadError;

const HEADER_END: usize = 0x150;

const TITLE: std::ops::Range<usize> = 0x134..0x143;
const CGB_FLAG: usize = 0x143;
const CART_TYPE: usize = 0x147;
const RAM_SIZE: usize = 0x149;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum MapperKind {
    RomOnly,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
    HuC1,
}

/// Facts derived once from the cartridge header.
#[derive(Clone, Debug)]
pub(crate) struct CartInfo {
    pub(crate) mapper: MapperKind,
    pub(crate) ram_size: usize,
    pub(crate) battery: bool,
    pub(crate) rtc: bool,
    pub(crate) rumble: bool,
    pub(crate) cgb: bool,
    pub(crate) title: String,
}

impl CartInfo {
    pub(crate) fn parse(rom: &[u8]) -> Result<Self, LoadError> {
        if rom.len() < HEADER_END {
            return Err(LoadError::InvalidImage(rom.len()));
        }

        let cart_type = rom[CART_TYPE];
        // (mapper, has ram, battery, rtc, rumble)
        let (mapper, ram, battery, rtc, rumble) = match cart_type {
            0x00 => (MapperKind::RomOnly, false, false, false, false),
            0x08 => (MapperKind::RomOnly, true, false, false, false),
            0x09 => (MapperKind::RomOnly, true, true, false, false),
            0x01 => (MapperKind::Mbc1, false, false, false, false),
            0x02 => (MapperKind::Mbc1, true, false, false, false),
            0x03 => (MapperKind::Mbc1, true, true, false, false),
            0x05 => (MapperKind::Mbc2, true, false, false, false),
            0x06 => (MapperKind::Mbc2, true, true, false, false),
            0x0F => (MapperKind::Mbc3, false, true, true, false),
            0x10 => (MapperKind::Mbc3, true, true, true, false),
            0x11 => (MapperKind::Mbc3, false, false, false, false),
            0x12 => (MapperKind::Mbc3, true, false, false, false),
            0x13 => (MapperKind::Mbc3, true, true, false, false),
            0x19 => (MapperKind::Mbc5, false, false, false, false),
            0x1A => (MapperKind::Mbc5, true, false, false, false),
            0x1B => (MapperKind::Mbc5, true, true, false, false),
            0x1C => (MapperKind::Mbc5, false, false, false, true),
            0x1D => (MapperKind::Mbc5, true, false, false, true),
            0x1E => (MapperKind::Mbc5, true, true, false, true),
            0xFF => (MapperKind::HuC1, true, true, false, false),
            other => return Err(LoadError::UnsupportedMapper(other)),
        };

        let ram_size = if mapper == MapperKind::Mbc2 {
            0x200
        } else if ram {
            match rom[RAM_SIZE] {
                0x01 => 0x800,
                0x02 => 0x2000,
                0x03 => 0x8000,
                0x04 => 0x20000,
                0x05 => 0x10000,
                _ => 0,
            }
        } else {
            0
        };

        let title_bytes = &rom[TITLE];
        let end = title_bytes
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        let title = title_bytes[..end].iter().map(|&b| b as char).collect();

        Ok(Self {
            mapper,
            ram_size,
            battery,
            rtc,
            rumble,
            cgb: rom[CGB_FLAG] & 0x80 != 0,
            title,
        })
    }
}
