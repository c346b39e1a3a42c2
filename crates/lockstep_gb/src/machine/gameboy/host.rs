use super::GameBoy;
use crate::machine::cartridge::MulticartDetector;
use crate::machine::hooks::{
    CdlCallback, InputGetter, LinkCallback, MemoryCallback, ScanlineCallback, ScanlineTrigger,
    TraceCallback,
};
use crate::machine::{DmgPalette, Layers, TimeMode};

/// Host-facing settings and callback registration. Each setter replaces the
/// previous value; passing `None` removes a callback.
impl GameBoy {
    pub fn set_layers(&mut self, layers: Layers) {
        self.bus.ppu.layers = layers;
    }

    /// Set shade `index` (masked to 0..=3) of a DMG palette to 0xRRGGBB.
    pub fn set_dmg_palette_color(&mut self, palette: DmgPalette, index: usize, rgb: u32) {
        self.bus.ppu.set_dmg_palette_color(palette, index, rgb);
    }

    /// Replace the CGB colour lookup, indexed by `r | g << 5 | b << 10`.
    pub fn set_cgb_palette(&mut self, lut: &[u32]) {
        self.bus.ppu.set_cgb_lut(lut);
    }

    /// Called whenever the game reads P1; the result replaces the held
    /// buttons.
    pub fn set_input_getter(&mut self, getter: Option<InputGetter>) {
        self.bus.hooks.input = getter;
    }

    /// Called with `(address, cycle offset)` before every CPU read that is
    /// not an opcode fetch.
    pub fn set_read_callback(&mut self, callback: Option<MemoryCallback>) {
        self.bus.hooks.read = callback;
    }

    pub fn set_write_callback(&mut self, callback: Option<MemoryCallback>) {
        self.bus.hooks.write = callback;
    }

    /// Called before every opcode fetch.
    pub fn set_exec_callback(&mut self, callback: Option<MemoryCallback>) {
        self.bus.hooks.exec = callback;
    }

    pub fn set_cd_callback(&mut self, callback: Option<CdlCallback>) {
        self.bus.hooks.cdl = callback;
    }

    /// Called with the register file once per executed instruction.
    pub fn set_trace_callback(&mut self, callback: Option<TraceCallback>) {
        self.bus.hooks.trace = callback;
    }

    /// Called at the start of matching lines, before the line is drawn. The
    /// callback may rewrite the scroll, window and palette registers.
    pub fn set_scanline_callback(
        &mut self,
        callback: Option<ScanlineCallback>,
        trigger: ScanlineTrigger,
    ) {
        self.bus.hooks.scanline = callback.map(|cb| (trigger, cb));
    }

    /// Called when an internally clocked serial transfer completes.
    pub fn set_link_callback(&mut self, callback: Option<LinkCallback>) {
        self.bus.hooks.link = callback;
    }

    /// Whether [`external_read`](Self::external_read) and
    /// [`external_write`](Self::external_write) fire the read/write hooks.
    /// Off by default.
    pub fn set_external_access_hooks(&mut self, enabled: bool) {
        self.bus.external_hooks = enabled;
    }

    /// Takes effect on the next [`load`](Self::load).
    pub fn set_multicart_detector(&mut self, detector: Box<dyn MulticartDetector>) {
        self.multicart_detector = detector;
    }

    pub fn set_time_mode(&mut self, mode: TimeMode) {
        self.time_mode = mode;
        if let Some(rtc) = self.bus.cartridge.as_mut().and_then(|c| c.rtc.as_mut()) {
            rtc.set_mode(mode);
        }
    }

    /// Adjust the cycles-per-second divisor used in cycle-based time mode.
    pub fn set_rtc_divisor_offset(&mut self, offset: i32) {
        self.rtc_divisor_offset = offset;
        if let Some(rtc) = self.bus.cartridge.as_mut().and_then(|c| c.rtc.as_mut()) {
            rtc.set_divisor_offset(offset);
        }
    }

    /// CPU cycles an undriven cartridge bus keeps its last value.
    pub fn set_cart_bus_pull_up_time(&mut self, cycles: u32) {
        self.pull_up_time = cycles;
        if let Some(cart) = self.bus.cartridge.as_mut() {
            cart.pull_up_time = cycles;
        }
    }
}
