use thiserror::Error;

/// Failure kinds reported by [`GameBoy::load`](crate::GameBoy::load) and
/// [`GameBoy::load_bios`](crate::GameBoy::load_bios).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("image is too small to contain a cartridge header ({0} bytes)")]
    InvalidImage(usize),
    #[error("unsupported cartridge type 0x{0:02X}")]
    UnsupportedMapper(u8),
    #[error("boot ROM size {0} does not match a known model")]
    BiosMismatch(usize),
}

impl LoadError {
    /// Stable negative result code, for hosts that speak integer results.
    pub fn code(&self) -> i32 {
        match self {
            LoadError::InvalidImage(_) => -1,
            LoadError::UnsupportedMapper(_) => -2,
            LoadError::BiosMismatch(_) => -3,
        }
    }
}

/// Failure kinds reported while restoring a save state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state header is missing or has an unknown version")]
    BadHeader,
    #[error("state stream ended early")]
    Truncated,
    #[error("state was taken for a different cartridge layout")]
    LayoutMismatch,
    #[error("no cartridge is loaded")]
    NoCartridge,
    #[error("{0} unread bytes after the end of the state")]
    TrailingData(usize),
}
