use crate::StateError;

const STATE_MAGIC: [u8; 4] = *b"LSGB";
const STATE_VERSION: u32 = 1;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SyncDirection {
    Save,
    Restore,
}

/// Bidirectional state walker.
///
/// Every component describes its state once, in a fixed order, through the
/// `sync_*` methods. When saving, each call appends the field to the output;
/// when restoring, each call overwrites the field from the input. Integers
/// are little-endian and variable-length data is length-prefixed.
///
/// Restore errors are sticky: after the first failure every further call is
/// a no-op and the error is reported by [`StateSync::finish`].
pub struct StateSync<'a> {
    direction: SyncDirection,
    out: Vec<u8>,
    input: &'a [u8],
    pos: usize,
    error: Option<StateError>,
}

/// Implemented by every component that is part of the saved machine state.
pub trait SyncState {
    fn sync_state(&mut self, s: &mut StateSync<'_>);
}

impl StateSync<'static> {
    pub fn saver() -> Self {
        let mut s = Self {
            direction: SyncDirection::Save,
            out: Vec::new(),
            input: &[],
            pos: 0,
            error: None,
        };
        s.out.extend_from_slice(&STATE_MAGIC);
        s.out.extend_from_slice(&STATE_VERSION.to_le_bytes());
        s
    }
}

impl<'a> StateSync<'a> {
    pub fn restorer(input: &'a [u8]) -> Self {
        let mut s = Self {
            direction: SyncDirection::Restore,
            out: Vec::new(),
            input,
            pos: 0,
            error: None,
        };
        let header_ok = input.len() >= 8
            && input[..4] == STATE_MAGIC
            && input[4..8] == STATE_VERSION.to_le_bytes();
        if header_ok {
            s.pos = 8;
        } else {
            s.error = Some(StateError::BadHeader);
        }
        s
    }

    pub fn direction(&self) -> SyncDirection {
        self.direction
    }

    pub fn is_restoring(&self) -> bool {
        self.direction == SyncDirection::Restore
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// Flag a semantic mismatch found by a component (for example a RAM
    /// size that does not fit the loaded cartridge).
    pub fn fail(&mut self, error: StateError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Saved bytes, including the header.
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    /// Outcome of a restore: trailing input is an error.
    pub fn finish(self) -> Result<(), StateError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.is_restoring() && self.pos != self.input.len() {
            return Err(StateError::TrailingData(self.input.len() - self.pos));
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.error.is_some() {
            return None;
        }
        let end = self.pos.checked_add(len)?;
        match self.input.get(self.pos..end) {
            Some(bytes) => {
                self.pos = end;
                Some(bytes)
            }
            None => {
                self.error = Some(StateError::Truncated);
                None
            }
        }
    }

    fn sync_le<const N: usize>(&mut self, bytes: &mut [u8; N]) {
        match self.direction {
            SyncDirection::Save => self.out.extend_from_slice(bytes),
            SyncDirection::Restore => {
                if let Some(src) = self.take(N) {
                    bytes.copy_from_slice(src);
                }
            }
        }
    }

    pub fn sync_u8(&mut self, v: &mut u8) {
        let mut b = [*v];
        self.sync_le(&mut b);
        *v = b[0];
    }

    pub fn sync_bool(&mut self, v: &mut bool) {
        let mut b = u8::from(*v);
        self.sync_u8(&mut b);
        *v = b != 0;
    }

    pub fn sync_u16(&mut self, v: &mut u16) {
        let mut b = v.to_le_bytes();
        self.sync_le(&mut b);
        *v = u16::from_le_bytes(b);
    }

    pub fn sync_u32(&mut self, v: &mut u32) {
        let mut b = v.to_le_bytes();
        self.sync_le(&mut b);
        *v = u32::from_le_bytes(b);
    }

    pub fn sync_i32(&mut self, v: &mut i32) {
        let mut b = v.to_le_bytes();
        self.sync_le(&mut b);
        *v = i32::from_le_bytes(b);
    }

    pub fn sync_u64(&mut self, v: &mut u64) {
        let mut b = v.to_le_bytes();
        self.sync_le(&mut b);
        *v = u64::from_le_bytes(b);
    }

    pub fn sync_option_u16(&mut self, v: &mut Option<u16>) {
        let mut present = v.is_some();
        let mut value = v.unwrap_or(0);
        self.sync_bool(&mut present);
        self.sync_u16(&mut value);
        *v = present.then_some(value);
    }

    /// Fixed-size memory. The length is recorded and must match on restore.
    pub fn sync_bytes(&mut self, data: &mut [u8]) {
        let mut len = data.len() as u32;
        self.sync_u32(&mut len);
        if self.is_restoring() && !self.failed() && len as usize != data.len() {
            self.fail(StateError::LayoutMismatch);
        }
        match self.direction {
            SyncDirection::Save => self.out.extend_from_slice(data),
            SyncDirection::Restore => {
                if let Some(src) = self.take(data.len()) {
                    data.copy_from_slice(src);
                }
            }
        }
    }

    pub fn sync_u32_slice(&mut self, data: &mut [u32]) {
        let mut len = data.len() as u32;
        self.sync_u32(&mut len);
        if self.is_restoring() && !self.failed() && len as usize != data.len() {
            self.fail(StateError::LayoutMismatch);
            return;
        }
        for v in data.iter_mut() {
            self.sync_u32(v);
        }
    }

    /// Growable list of words; on restore the vector is replaced.
    pub fn sync_u32_vec(&mut self, data: &mut Vec<u32>) {
        let mut len = data.len() as u32;
        self.sync_u32(&mut len);
        if self.is_restoring() {
            if self.failed() {
                return;
            }
            let remaining = (self.input.len() - self.pos) / 4;
            if len as usize > remaining {
                self.fail(StateError::Truncated);
                return;
            }
            data.clear();
            data.resize(len as usize, 0);
        }
        for v in data.iter_mut() {
            self.sync_u32(v);
        }
    }
}
