use super::super::{Bus, Cpu};

/// Interrupt vector base; each source is 8 bytes apart in priority order
/// (VBlank, STAT, Timer, Serial, Joypad).
pub(in crate::cpu) const VECTOR_BASE: u16 = 0x0040;

impl Cpu {
    /// Whether an interrupt should be dispatched now.
    ///
    /// A pending interrupt always ends HALT; with IME clear the CPU simply
    /// resumes after the HALT instead of dispatching.
    pub(in crate::cpu) fn interrupt_ready<B: Bus>(&mut self, bus: &mut B) -> bool {
        let pending = bus.interrupt_enable() & bus.interrupt_flags() & 0x1F;
        if pending == 0 {
            return false;
        }
        if self.halted && !self.ime {
            self.halted = false;
            return false;
        }
        self.ime
    }

    /// Select the highest-priority pending interrupt after the high byte of
    /// PC was pushed and return `(index, IF without that bit)`.
    ///
    /// The push may itself have written IE (SP=0x0000), so IE is sampled
    /// here rather than before the dispatch started.
    pub(in crate::cpu) fn select_interrupt<B: Bus>(&mut self, bus: &mut B) -> Option<(u8, u8)> {
        let iflags = bus.interrupt_flags();
        let pending = bus.interrupt_enable() & iflags & 0x1F;
        if pending == 0 {
            return None;
        }
        let index = pending.trailing_zeros() as u8;
        Some((index, iflags & !(1 << index)))
    }
}
