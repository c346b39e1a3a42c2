use super::GameBoyBus;
use crate::machine::state::{StateSync, SyncState};
use crate::StateError;

impl SyncState for GameBoyBus {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        let mut has_cart = self.cartridge.is_some();
        s.sync_bool(&mut has_cart);
        if s.is_restoring() && has_cart != self.cartridge.is_some() {
            s.fail(StateError::LayoutMismatch);
            return;
        }

        s.sync_bool(&mut self.bios_mapped);
        s.sync_bytes(&mut self.wram);
        s.sync_u8(&mut self.wram_bank);
        s.sync_bytes(&mut self.hram);
        s.sync_u8(&mut self.if_reg);
        s.sync_u8(&mut self.ie_reg);
        s.sync_u8(&mut self.joyp_select);
        let mut buttons = self.buttons.bits();
        s.sync_u8(&mut buttons);
        self.buttons = crate::machine::hooks::Buttons::from_bits_retain(buttons);
        s.sync_u8(&mut self.dma_reg);
        self.hdma.sync_state(s);
        s.sync_bool(&mut self.double_speed);
        s.sync_bool(&mut self.key1_armed);
        s.sync_u8(&mut self.speed_subcycle);
        s.sync_u32(&mut self.stall_cycles);
        s.sync_u32(&mut self.speed_switch_pause);
        s.sync_u64(&mut self.cycles);
        self.timer.sync_state(s);

        if let Some(cart) = self.cartridge.as_mut() {
            cart.sync_state(s);
        }
        self.ppu.sync_state(s);
        self.apu.sync_state(s);
        self.serial.sync_state(s);
        self.debugger.sync_state(s);

        // Stay inside valid ranges even if the stream was hand-edited.
        self.wram_bank = (self.wram_bank & 0x07).max(1);
        self.if_reg &= 0x1F;
    }
}
