use super::GameBoy;
use crate::machine::state::{StateSync, SyncState};
use crate::StateError;

impl GameBoy {
    /// Battery-backed cartridge RAM, followed by the 48-byte clock footer
    /// when the cartridge has an RTC and `deterministic` is false.
    ///
    /// Empty for cartridges without a battery or when nothing is loaded.
    pub fn save_savedata(&mut self, deterministic: bool) -> Vec<u8> {
        self.bus
            .cartridge
            .as_mut()
            .map(|cart| cart.save_savedata(deterministic))
            .unwrap_or_default()
    }

    /// Counterpart of [`save_savedata`](Self::save_savedata). A shorter
    /// image only overwrites what it covers.
    pub fn load_savedata(&mut self, data: &[u8], deterministic: bool) {
        if let Some(cart) = self.bus.cartridge.as_mut() {
            cart.load_savedata(data, deterministic);
        }
    }

    pub fn save_savedata_length(&self, deterministic: bool) -> usize {
        self.bus
            .cartridge
            .as_ref()
            .map_or(0, |cart| cart.savedata_len(deterministic))
    }

    /// Walk the whole machine state in `s`'s direction.
    ///
    /// A restore through this method is not rolled back on error; use
    /// [`load_state`](Self::load_state) for that.
    pub fn sync_state(&mut self, s: &mut StateSync<'_>) {
        self.cpu.sync_state(s);
        self.bus.sync_state(s);
    }

    pub fn save_state(&mut self) -> Result<Vec<u8>, StateError> {
        if !self.is_loaded() {
            return Err(StateError::NoCartridge);
        }
        let mut s = StateSync::saver();
        self.sync_state(&mut s);
        Ok(s.into_bytes())
    }

    /// Restore a state produced by [`save_state`](Self::save_state) for the
    /// same cartridge. On error the machine is left as it was.
    pub fn load_state(&mut self, data: &[u8]) -> Result<(), StateError> {
        let snapshot = self.save_state()?;

        let mut s = StateSync::restorer(data);
        self.sync_state(&mut s);
        let result = s.finish();

        if let Err(err) = result {
            log::warn!("state restore failed: {err}");
            let mut rollback = StateSync::restorer(&snapshot);
            self.sync_state(&mut rollback);
            return Err(err);
        }
        Ok(())
    }
}
