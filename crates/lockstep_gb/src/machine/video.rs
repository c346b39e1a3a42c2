mod mmio;
mod render;
mod timing;

use bitflags::bitflags;

use super::hooks::LineRegisters;
use super::state::{StateSync, SyncState};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub(crate) const LINE_CYCLES: u32 = 456;
pub(crate) const LINES_PER_FRAME: u8 = 154;
pub(crate) const VBLANK_LINE: u8 = 144;
const OAM_SCAN_CYCLES: u32 = 80;
const TRANSFER_END: u32 = OAM_SCAN_CYCLES + 172;

pub(crate) const VRAM_BANK_SIZE: usize = 0x2000;
pub(crate) const OAM_SIZE: usize = 0xA0;
const CGB_LUT_SIZE: usize = 0x8000;
const FRAME_PIXELS: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

pub(crate) const VBLANK_IRQ: u8 = 0x01;
pub(crate) const STAT_IRQ: u8 = 0x02;

bitflags! {
    /// Which picture layers are drawn. A cleared layer renders as
    /// transparent (colour 0) without changing priorities.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct Layers: u8 {
        const BG = 0x01;
        const OBJ = 0x02;
        const WINDOW = 0x04;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Layers::all()
    }
}

/// DMG palette slot used by `set_dmg_palette_color`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DmgPalette {
    Background = 0,
    Sprite1 = 1,
    Sprite2 = 2,
}

impl DmgPalette {
    /// Out-of-range numbers clamp to the last palette.
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => DmgPalette::Background,
            1 => DmgPalette::Sprite1,
            _ => DmgPalette::Sprite2,
        }
    }
}

const DEFAULT_DMG_SHADES: [u32; 4] = [0x00FF_FFFF, 0x00AA_AAAA, 0x0055_5555, 0x0000_0000];

bitflags! {
    /// What happened during one PPU cycle.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub(crate) struct PpuEvents: u8 {
        /// A new line started (LY was just set); the line has not been drawn.
        const LINE_START = 0x01;
        /// A frame was published to the front buffer.
        const FRAME_DONE = 0x02;
        /// Mode 0 began on a visible line.
        const HBLANK = 0x04;
    }
}

/// Default CGB colour correction: plain 5-bit to 8-bit expansion.
fn default_cgb_lut() -> Box<[u32]> {
    (0..CGB_LUT_SIZE as u32)
        .map(|rgb15| {
            let expand = |c: u32| (c << 3) | (c >> 2);
            let r = expand(rgb15 & 0x1F);
            let g = expand((rgb15 >> 5) & 0x1F);
            let b = expand((rgb15 >> 10) & 0x1F);
            (r << 16) | (g << 8) | b
        })
        .collect()
}

/// Picture processing unit: registers, video memory, line timing and the
/// two framebuffers.
pub(crate) struct Ppu {
    pub(crate) vram: Vec<u8>,
    pub(crate) vram_bank: u8,
    pub(crate) oam: [u8; OAM_SIZE],

    pub(crate) lcdc: u8,
    /// Interrupt select bits 3-6 only.
    stat_select: u8,
    pub(crate) scy: u8,
    pub(crate) scx: u8,
    pub(crate) ly: u8,
    pub(crate) lyc: u8,
    pub(crate) bgp: u8,
    pub(crate) obp0: u8,
    pub(crate) obp1: u8,
    pub(crate) wy: u8,
    pub(crate) wx: u8,

    line_cycle: u32,
    /// Cycles counted while the LCD is off, towards the next blank frame.
    off_cycles: u32,
    window_line: u8,
    /// WY matched LY at some line start this frame.
    window_y_hit: bool,
    stat_line: bool,

    cgb: bool,
    bg_palette_ram: [u8; 64],
    obj_palette_ram: [u8; 64],
    bcps: u8,
    ocps: u8,

    dmg_palettes: [[u32; 4]; 3],
    cgb_lut: Box<[u32]>,
    pub(crate) layers: Layers,

    back: Vec<u32>,
    front: Vec<u32>,
}

impl Ppu {
    pub(crate) fn new() -> Self {
        Self {
            vram: vec![0; VRAM_BANK_SIZE * 2],
            vram_bank: 0,
            oam: [0; OAM_SIZE],
            lcdc: 0,
            stat_select: 0,
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: 0,
            obp0: 0,
            obp1: 0,
            wy: 0,
            wx: 0,
            line_cycle: 0,
            off_cycles: 0,
            window_line: 0,
            window_y_hit: false,
            stat_line: false,
            cgb: false,
            bg_palette_ram: [0xFF; 64],
            obj_palette_ram: [0xFF; 64],
            bcps: 0,
            ocps: 0,
            dmg_palettes: [DEFAULT_DMG_SHADES; 3],
            cgb_lut: default_cgb_lut(),
            layers: Layers::all(),
            back: vec![0; FRAME_PIXELS],
            front: vec![0; FRAME_PIXELS],
        }
    }

    /// Power-on state. Host palettes and the layer mask are kept.
    pub(crate) fn reset(&mut self, cgb: bool, post_boot: bool) {
        self.vram.fill(0);
        self.vram_bank = 0;
        self.oam.fill(0);
        self.lcdc = if post_boot { 0x91 } else { 0x00 };
        self.stat_select = 0;
        self.scy = 0;
        self.scx = 0;
        self.ly = 0;
        self.lyc = 0;
        self.bgp = if post_boot { 0xFC } else { 0x00 };
        self.obp0 = 0xFF;
        self.obp1 = 0xFF;
        self.wy = 0;
        self.wx = 0;
        self.line_cycle = 0;
        self.off_cycles = 0;
        self.window_line = 0;
        self.window_y_hit = false;
        self.stat_line = false;
        self.cgb = cgb;
        self.bg_palette_ram = [0xFF; 64];
        self.obj_palette_ram = [0xFF; 64];
        self.bcps = 0;
        self.ocps = 0;
        let white = self.blank_color();
        self.back.fill(white);
        self.front.fill(white);
    }

    pub(crate) fn lcd_enabled(&self) -> bool {
        self.lcdc & 0x80 != 0
    }

    pub(crate) fn set_dmg_palette_color(&mut self, palette: DmgPalette, index: usize, rgb: u32) {
        self.dmg_palettes[palette as usize][index & 3] = rgb;
    }

    /// Replace the CGB colour table. Short tables only replace their prefix.
    pub(crate) fn set_cgb_lut(&mut self, lut: &[u32]) {
        let n = lut.len().min(CGB_LUT_SIZE);
        self.cgb_lut[..n].copy_from_slice(&lut[..n]);
    }

    fn blank_color(&self) -> u32 {
        if self.cgb {
            self.cgb_lut[0x7FFF]
        } else {
            self.dmg_palettes[0][0]
        }
    }

    fn publish_frame(&mut self) {
        std::mem::swap(&mut self.back, &mut self.front);
    }

    /// Copy the last completed frame into `dest`, `pitch` pixels per row.
    /// Rows that do not fit are skipped.
    pub(crate) fn blit_to(&self, dest: &mut [u32], pitch: usize) {
        let pitch = pitch.max(SCREEN_WIDTH);
        for (y, row) in self.front.chunks_exact(SCREEN_WIDTH).enumerate() {
            let Some(start) = y.checked_mul(pitch) else {
                break;
            };
            match dest.get_mut(start..start.saturating_add(SCREEN_WIDTH)) {
                Some(out) => out.copy_from_slice(row),
                None => break,
            }
        }
    }

    pub(crate) fn line_registers(&self) -> LineRegisters {
        LineRegisters {
            scy: self.scy,
            scx: self.scx,
            wy: self.wy,
            wx: self.wx,
            bgp: self.bgp,
            obp0: self.obp0,
            obp1: self.obp1,
        }
    }

    pub(crate) fn apply_line_registers(&mut self, regs: &LineRegisters) {
        self.scy = regs.scy;
        self.scx = regs.scx;
        self.wy = regs.wy;
        self.wx = regs.wx;
        self.bgp = regs.bgp;
        self.obp0 = regs.obp0;
        self.obp1 = regs.obp1;
    }
}

impl SyncState for Ppu {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        s.sync_bytes(&mut self.vram);
        s.sync_u8(&mut self.vram_bank);
        self.vram_bank &= 1;
        s.sync_bytes(&mut self.oam);
        for reg in [
            &mut self.lcdc,
            &mut self.stat_select,
            &mut self.scy,
            &mut self.scx,
            &mut self.ly,
            &mut self.lyc,
            &mut self.bgp,
            &mut self.obp0,
            &mut self.obp1,
            &mut self.wy,
            &mut self.wx,
        ] {
            s.sync_u8(reg);
        }
        s.sync_u32(&mut self.line_cycle);
        s.sync_u32(&mut self.off_cycles);
        self.line_cycle %= LINE_CYCLES;
        self.ly %= LINES_PER_FRAME;
        self.off_cycles %= crate::CYCLES_PER_FRAME;
        s.sync_u8(&mut self.window_line);
        s.sync_bool(&mut self.window_y_hit);
        s.sync_bool(&mut self.stat_line);
        s.sync_bool(&mut self.cgb);
        s.sync_bytes(&mut self.bg_palette_ram);
        s.sync_bytes(&mut self.obj_palette_ram);
        s.sync_u8(&mut self.bcps);
        s.sync_u8(&mut self.ocps);
        s.sync_u32_slice(&mut self.back);
        s.sync_u32_slice(&mut self.front);
    }
}
