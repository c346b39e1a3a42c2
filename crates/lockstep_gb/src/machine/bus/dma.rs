use super::GameBoyBus;
use crate::machine::state::{StateSync, SyncState};

/// CPU cycles per 16-byte VRAM DMA block at normal speed.
const HDMA_BLOCK_CYCLES: u32 = 32;

/// CGB VRAM DMA registers (HDMA1-HDMA5).
#[derive(Default)]
pub(crate) struct Hdma {
    src: u16,
    /// Offset into VRAM (0000-1FF0).
    dst: u16,
    blocks_left: u8,
    hblank_active: bool,
}

impl SyncState for Hdma {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_u16(&mut self.src);
        s.sync_u16(&mut self.dst);
        s.sync_u8(&mut self.blocks_left);
        s.sync_bool(&mut self.hblank_active);
    }
}

impl GameBoyBus {
    /// OAM DMA. The 160-byte copy happens at once.
    pub(super) fn do_oam_dma(&mut self, value: u8) {
        self.dma_reg = value;
        let base = u16::from(value) << 8;
        for i in 0..0xA0u16 {
            let mut src = base.wrapping_add(i);
            if src >= 0xE000 {
                src -= 0x2000;
            }
            self.ppu.oam[usize::from(i)] = self.read_mapped(src);
        }
    }

    pub(super) fn read_dma(&self) -> u8 {
        self.dma_reg
    }

    pub(super) fn write_hdma(&mut self, addr: u16, value: u8) {
        let h = &mut self.hdma;
        match addr {
            0xFF51 => h.src = (h.src & 0x00FF) | (u16::from(value) << 8),
            0xFF52 => h.src = (h.src & 0xFF00) | u16::from(value & 0xF0),
            0xFF53 => h.dst = (h.dst & 0x00FF) | (u16::from(value & 0x1F) << 8),
            0xFF54 => h.dst = (h.dst & 0xFF00) | u16::from(value & 0xF0),
            _ => self.write_hdma5(value),
        }
    }

    fn write_hdma5(&mut self, value: u8) {
        let blocks = (value & 0x7F) + 1;
        if self.hdma.hblank_active && value & 0x80 == 0 {
            self.hdma.hblank_active = false;
            log::debug!("HDMA: cancelled with {} blocks left", self.hdma.blocks_left);
            return;
        }
        if value & 0x80 != 0 {
            self.hdma.blocks_left = blocks;
            self.hdma.hblank_active = true;
        } else {
            for _ in 0..blocks {
                self.copy_hdma_block();
            }
            self.hdma.blocks_left = 0;
        }
    }

    pub(super) fn read_hdma5(&self) -> u8 {
        if self.hdma.hblank_active {
            self.hdma.blocks_left.wrapping_sub(1) & 0x7F
        } else if self.hdma.blocks_left == 0 {
            0xFF
        } else {
            0x80 | (self.hdma.blocks_left.wrapping_sub(1) & 0x7F)
        }
    }

    /// One block per HBlank while an HBlank transfer is running.
    pub(super) fn on_hblank(&mut self) {
        if !self.hdma.hblank_active {
            return;
        }
        self.copy_hdma_block();
        self.hdma.blocks_left -= 1;
        if self.hdma.blocks_left == 0 {
            self.hdma.hblank_active = false;
        }
    }

    fn copy_hdma_block(&mut self) {
        for _ in 0..16 {
            let value = self.read_mapped(self.hdma.src);
            self.ppu.poke_vram(0x8000 | (self.hdma.dst & 0x1FFF), value);
            self.hdma.src = self.hdma.src.wrapping_add(1);
            self.hdma.dst = (self.hdma.dst + 1) & 0x1FFF;
        }
        let per_block = if self.double_speed {
            HDMA_BLOCK_CYCLES * 2
        } else {
            HDMA_BLOCK_CYCLES
        };
        self.stall_cycles += per_block;
    }
}
