pub mod cpu;
mod error;
pub mod machine;

pub use error::{LoadError, StateError};
pub use machine::{
    BankSelector, Breakpoint, Buttons, CdlAddrKind, CdlCallback, CdlFlags, DmgPalette, GameBoy,
    GameBoyModel, InputGetter, Layers, LineRegisters, LinkCallback, LoadFlags, MemoryArea,
    MemoryCallback, MulticartDetector, RtcRegisters, ScanlineCallback, ScanlineTrigger,
    StateSync, SyncDirection, SyncState, TimeMode, TraceCallback,
};

/// Logical screen width in pixels.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;

/// Real-time clock cycles in one video frame (154 lines of 456 cycles).
pub const CYCLES_PER_FRAME: u32 = 70_224;
/// Stereo audio samples produced per video frame.
pub const SAMPLES_PER_FRAME: usize = 35_112;
/// Upper bound on how far `run_for` may run past the requested sample count.
pub const MAX_OVERSHOOT_SAMPLES: usize = 2_064;
