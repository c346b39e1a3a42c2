/// Decides whether an MBC1 image is really a multicart collection.
///
/// Multicarts report plain MBC1 in their header, so telling them apart is a
/// heuristic; hosts may install their own.
pub trait MulticartDetector {
    fn is_multicart(&self, rom: &[u8]) -> bool;
}

const LOGO: std::ops::Range<usize> = 0x104..0x134;
const MULTICART_SIZE: usize = 0x10_0000;
/// Start of the second game on a 4-in-1 board.
const SECOND_GAME: usize = 0x4_0000;

/// Flags 1 MiB MBC1 images that carry a second boot logo at the start of
/// the second 256 KiB game.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LogoDetector;

impl MulticartDetector for LogoDetector {
    fn is_multicart(&self, rom: &[u8]) -> bool {
        if rom.len() != MULTICART_SIZE {
            return false;
        }
        let second = (LOGO.start + SECOND_GAME)..(LOGO.end + SECOND_GAME);
        rom[LOGO] == rom[second]
    }
}
