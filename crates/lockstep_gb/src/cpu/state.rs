use super::{Cpu, Registers};
use crate::machine::{StateSync, SyncState};

impl SyncState for Cpu {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        let mut regs = self.regs.to_array();
        for slot in regs.iter_mut() {
            s.sync_u16(slot);
        }
        if s.is_restoring() {
            self.regs = Registers::from_array(&regs);
        }
        s.sync_bool(&mut self.ime);
        s.sync_bool(&mut self.halted);
        s.sync_bool(&mut self.stopped);
        s.sync_bool(&mut self.halt_bug);
        s.sync_bool(&mut self.ime_enable_pending);
        s.sync_bool(&mut self.ime_enable_delay);
        s.sync_bool(&mut self.locked);
    }
}
