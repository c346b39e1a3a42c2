mod audio;
mod bus;
mod cartridge;
mod debug;
mod gameboy;
mod hooks;
mod serial;
mod state;
mod timer;
mod video;

pub(crate) use bus::GameBoyBus;
pub use cartridge::{MulticartDetector, RtcRegisters, TimeMode};
pub use debug::{BankSelector, Breakpoint};
pub use gameboy::{GameBoy, LoadFlags, MemoryArea};
pub use hooks::{
    Buttons, CdlAddrKind, CdlCallback, CdlFlags, InputGetter, LineRegisters, LinkCallback,
    MemoryCallback, ScanlineCallback, ScanlineTrigger, TraceCallback,
};
pub use state::{StateSync, SyncDirection, SyncState};
pub use video::{DmgPalette, Layers};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum GameBoyModel {
    #[default]
    Dmg,
    /// CGB hardware running a DMG-only cartridge in compatibility mode.
    ///
    /// Registers and rendering behave like DMG; only the reported model
    /// differs.
    CgbCompat,
    Cgb,
}

impl GameBoyModel {
    /// Whether CGB-only registers and rendering features are live.
    pub fn cgb_features(self) -> bool {
        self == GameBoyModel::Cgb
    }
}

#[cfg(test)]
mod tests;
