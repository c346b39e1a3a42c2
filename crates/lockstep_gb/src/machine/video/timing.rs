use super::{
    Ppu, PpuEvents, LINES_PER_FRAME, LINE_CYCLES, OAM_SCAN_CYCLES, STAT_IRQ, TRANSFER_END,
    VBLANK_IRQ, VBLANK_LINE,
};
use crate::CYCLES_PER_FRAME;

impl Ppu {
    /// Current PPU mode as reported in STAT bits 0-1.
    pub(crate) fn mode(&self) -> u8 {
        if !self.lcd_enabled() {
            0
        } else if self.ly >= VBLANK_LINE {
            1
        } else if self.line_cycle < OAM_SCAN_CYCLES {
            2
        } else if self.line_cycle < TRANSFER_END {
            3
        } else {
            0
        }
    }

    /// Advance by one real-time cycle.
    ///
    /// Line start, frame publication and HBlank entry are reported back so
    /// the bus can run the scanline hook, audio bookkeeping and HDMA.
    pub(crate) fn cycle(&mut self, if_reg: &mut u8) -> PpuEvents {
        let mut events = PpuEvents::empty();

        if !self.lcd_enabled() {
            self.off_cycles += 1;
            if self.off_cycles >= CYCLES_PER_FRAME {
                self.off_cycles = 0;
                let white = self.blank_color();
                self.back.fill(white);
                self.publish_frame();
                events |= PpuEvents::FRAME_DONE;
            }
            return events;
        }

        if self.line_cycle == 0 {
            events |= PpuEvents::LINE_START;
            if self.ly == 0 {
                self.window_line = 0;
                self.window_y_hit = false;
            }
            if self.ly == VBLANK_LINE {
                *if_reg |= VBLANK_IRQ;
                // DMG raises STAT at VBlank start when the mode 2 source is
                // selected.
                if !self.cgb && self.stat_select & 0x20 != 0 {
                    *if_reg |= STAT_IRQ;
                }
                self.publish_frame();
                events |= PpuEvents::FRAME_DONE;
                log::debug!("PPU: VBlank, IF=0x{:02X}", *if_reg);
            }
        }

        if self.ly < VBLANK_LINE {
            if self.line_cycle == OAM_SCAN_CYCLES {
                self.render_line();
            } else if self.line_cycle == TRANSFER_END {
                events |= PpuEvents::HBLANK;
            }
        }

        self.update_stat_line(if_reg);

        self.line_cycle += 1;
        if self.line_cycle == LINE_CYCLES {
            self.line_cycle = 0;
            self.ly = (self.ly + 1) % LINES_PER_FRAME;
        }

        events
    }

    /// Recompute the STAT interrupt line and raise INT 48 on a rising edge
    /// of the OR of all selected sources.
    pub(crate) fn update_stat_line(&mut self, if_reg: &mut u8) {
        if !self.lcd_enabled() {
            self.stat_line = false;
            return;
        }
        let mode = self.mode();
        let select = self.stat_select;
        let line = (select & 0x40 != 0 && self.ly == self.lyc)
            || (select & 0x20 != 0 && mode == 2)
            || (select & 0x10 != 0 && mode == 1)
            || (select & 0x08 != 0 && mode == 0);

        if line && !self.stat_line {
            *if_reg |= STAT_IRQ;
            log::trace!(
                "PPU: STAT rising edge (LY={} mode={} select=0x{:02X})",
                self.ly,
                mode,
                select
            );
        }
        self.stat_line = line;
    }

    /// LCDC.7 off: the PPU stops at line 0 and the screen goes blank from
    /// the next frame-length interval on.
    pub(super) fn lcd_off(&mut self) {
        self.ly = 0;
        self.line_cycle = 0;
        self.off_cycles = 0;
        self.stat_line = false;
        log::debug!("PPU: LCD off");
    }

    pub(super) fn lcd_on(&mut self, if_reg: &mut u8) {
        self.ly = 0;
        self.line_cycle = 0;
        self.window_line = 0;
        self.window_y_hit = false;
        self.stat_line = false;
        self.update_stat_line(if_reg);
        log::debug!("PPU: LCD on");
    }

    /// VRAM is blocked during pixel transfer.
    pub(crate) fn vram_accessible(&self) -> bool {
        self.mode() != 3
    }

    /// OAM is blocked during OAM scan and pixel transfer.
    pub(crate) fn oam_accessible(&self) -> bool {
        matches!(self.mode(), 0 | 1)
    }
}
