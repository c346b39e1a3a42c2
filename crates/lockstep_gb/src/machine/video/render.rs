use super::{Layers, Ppu, VRAM_BANK_SIZE};
use crate::SCREEN_WIDTH;

const MAX_SPRITES_PER_LINE: usize = 10;

/// Background/window pixel as seen by the sprite compositor.
#[derive(Copy, Clone, Default)]
struct BgPixel {
    color: u8,
    /// CGB palette number (0 on DMG).
    palette: u8,
    /// CGB tile attribute bit 7.
    priority: bool,
}

#[derive(Copy, Clone)]
struct Sprite {
    index: usize,
    y: i16,
    x: i16,
    tile: u8,
    attrs: u8,
}

impl Ppu {
    fn tile_row(&self, bank: usize, tile_addr: usize, row: usize) -> (u8, u8) {
        let base = bank * VRAM_BANK_SIZE + tile_addr + row * 2;
        (self.vram[base], self.vram[base + 1])
    }

    /// VRAM offset of the tile data for `tile`, honouring LCDC.4.
    fn bg_tile_addr(&self, tile: u8) -> usize {
        if self.lcdc & 0x10 != 0 {
            usize::from(tile) * 16
        } else {
            (0x1000i32 + i32::from(tile as i8) * 16) as usize
        }
    }

    /// Fetch one BG or window pixel from map `map_base` at map coordinates
    /// (`x`, `y`).
    fn map_pixel(&self, map_base: usize, x: u8, y: u8) -> BgPixel {
        let map_index = map_base + usize::from(y / 8) * 32 + usize::from(x / 8);
        let tile = self.vram[map_index];
        let attrs = if self.cgb {
            self.vram[VRAM_BANK_SIZE + map_index]
        } else {
            0
        };

        let bank = usize::from(attrs >> 3 & 1);
        let mut row = usize::from(y & 7);
        if attrs & 0x40 != 0 {
            row = 7 - row;
        }
        let mut bit = 7 - (x & 7);
        if attrs & 0x20 != 0 {
            bit = x & 7;
        }
        let (lo, hi) = self.tile_row(bank, self.bg_tile_addr(tile), row);
        BgPixel {
            color: ((hi >> bit) & 1) << 1 | ((lo >> bit) & 1),
            palette: attrs & 0x07,
            priority: attrs & 0x80 != 0,
        }
    }

    /// Draw the current line into the back buffer.
    pub(super) fn render_line(&mut self) {
        let ly = self.ly;
        if ly == self.wy {
            self.window_y_hit = true;
        }

        // On DMG, LCDC.0 blanks BG and window; on CGB it only drops their
        // priority over sprites.
        let bg_enabled = self.cgb || self.lcdc & 0x01 != 0;
        let draw_bg = bg_enabled && self.layers.contains(Layers::BG);
        let window_on = bg_enabled
            && self.lcdc & 0x20 != 0
            && self.window_y_hit
            && self.wx <= 166;
        let draw_window = window_on && self.layers.contains(Layers::WINDOW);

        let bg_map = if self.lcdc & 0x08 != 0 { 0x1C00 } else { 0x1800 };
        let win_map = if self.lcdc & 0x40 != 0 { 0x1C00 } else { 0x1800 };
        let win_start = i16::from(self.wx) - 7;

        let mut line = [BgPixel::default(); SCREEN_WIDTH];
        let mut window_used = false;
        for (x, px) in line.iter_mut().enumerate() {
            let xi = x as i16;
            if window_on && xi >= win_start {
                window_used = true;
                if draw_window {
                    *px = self.map_pixel(win_map, (xi - win_start) as u8, self.window_line);
                }
            } else if draw_bg {
                *px = self.map_pixel(
                    bg_map,
                    (x as u8).wrapping_add(self.scx),
                    ly.wrapping_add(self.scy),
                );
            }
        }
        if window_used {
            self.window_line = self.window_line.wrapping_add(1);
        }

        let row_start = usize::from(ly) * SCREEN_WIDTH;
        for (x, px) in line.iter().enumerate() {
            self.back[row_start + x] = self.bg_color(*px);
        }

        if self.lcdc & 0x02 != 0 && self.layers.contains(Layers::OBJ) {
            self.render_sprites(&line, row_start);
        }
    }

    fn bg_color(&self, px: BgPixel) -> u32 {
        if self.cgb {
            self.cgb_color(&self.bg_palette_ram, px.palette, px.color)
        } else {
            let shade = (self.bgp >> (px.color * 2)) & 0x03;
            self.dmg_palettes[0][usize::from(shade)]
        }
    }

    fn cgb_color(&self, ram: &[u8; 64], palette: u8, color: u8) -> u32 {
        let i = usize::from(palette) * 8 + usize::from(color) * 2;
        let rgb15 = u16::from(ram[i]) | (u16::from(ram[i + 1]) << 8);
        self.cgb_lut[usize::from(rgb15 & 0x7FFF)]
    }

    fn line_sprites(&self, height: i16) -> Vec<Sprite> {
        let ly = i16::from(self.ly);
        let mut sprites: Vec<Sprite> = self
            .oam
            .chunks_exact(4)
            .enumerate()
            .map(|(index, e)| Sprite {
                index,
                y: i16::from(e[0]) - 16,
                x: i16::from(e[1]) - 8,
                tile: e[2],
                attrs: e[3],
            })
            .filter(|s| ly >= s.y && ly < s.y + height)
            .take(MAX_SPRITES_PER_LINE)
            .collect();
        if !self.cgb {
            // Lower X wins, then lower OAM index.
            sprites.sort_by_key(|s| (s.x, s.index));
        }
        sprites
    }

    fn render_sprites(&mut self, line: &[BgPixel; SCREEN_WIDTH], row_start: usize) {
        let tall = self.lcdc & 0x04 != 0;
        let height: i16 = if tall { 16 } else { 8 };
        let master_priority = !self.cgb || self.lcdc & 0x01 != 0;
        let mut taken = [false; SCREEN_WIDTH];

        for sprite in self.line_sprites(height) {
            let mut row = i16::from(self.ly) - sprite.y;
            if sprite.attrs & 0x40 != 0 {
                row = height - 1 - row;
            }
            let tile = if tall { sprite.tile & 0xFE } else { sprite.tile };
            let bank = if self.cgb {
                usize::from(sprite.attrs >> 3 & 1)
            } else {
                0
            };
            let (lo, hi) = self.tile_row(bank, usize::from(tile) * 16, row as usize);

            for col in 0..8i16 {
                let x = sprite.x + col;
                if !(0..SCREEN_WIDTH as i16).contains(&x) {
                    continue;
                }
                let x = x as usize;
                if taken[x] {
                    continue;
                }
                let bit = if sprite.attrs & 0x20 != 0 { col } else { 7 - col };
                let color = ((hi >> bit) & 1) << 1 | ((lo >> bit) & 1);
                if color == 0 {
                    continue;
                }
                taken[x] = true;

                let bg = line[x];
                let behind_bg = sprite.attrs & 0x80 != 0 || (self.cgb && bg.priority);
                if master_priority && behind_bg && bg.color != 0 {
                    continue;
                }
                self.back[row_start + x] = self.sprite_color(sprite.attrs, color);
            }
        }
    }

    fn sprite_color(&self, attrs: u8, color: u8) -> u32 {
        if self.cgb {
            self.cgb_color(&self.obj_palette_ram, attrs & 0x07, color)
        } else if attrs & 0x10 != 0 {
            let shade = (self.obp1 >> (color * 2)) & 0x03;
            self.dmg_palettes[2][usize::from(shade)]
        } else {
            let shade = (self.obp0 >> (color * 2)) & 0x03;
            self.dmg_palettes[1][usize::from(shade)]
        }
    }
}
