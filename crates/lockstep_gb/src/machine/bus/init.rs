use super::GameBoyBus;
use crate::machine::hooks::Buttons;

impl GameBoyBus {
    /// Put every unit into its power-on state.
    ///
    /// With `post_boot` the registers look the way the boot ROM leaves
    /// them at PC=0x0100; otherwise the boot ROM is mapped in and runs
    /// first. The cartridge keeps its RAM and clock.
    pub(crate) fn power_on(&mut self, post_boot: bool) {
        let cgb = self.cgb();
        self.randomize_internal_ram();

        self.bios_mapped = !post_boot && self.bios.is_some();
        self.wram_bank = 1;
        self.if_reg = if post_boot { 0x01 } else { 0x00 };
        self.ie_reg = 0x00;

        if post_boot {
            self.timer.init_post_boot(cgb);
        } else {
            self.timer.init_for_bios();
        }
        self.serial.reset(cgb);
        self.ppu.reset(cgb, post_boot);
        self.apu.reset(post_boot);

        self.joyp_select = 0x30;
        self.buttons = Buttons::empty();
        self.dma_reg = 0xFF;
        self.hdma = Default::default();

        self.double_speed = false;
        self.key1_armed = false;
        self.speed_subcycle = 0;
        self.stall_cycles = 0;
        self.speed_switch_pause = 0;

        self.cycles = 0;
        self.run_cycles = 0;
        self.access_cycles = 0;
        self.frame_sample = None;
        self.debugger.reset();

        if let Some(cart) = self.cartridge.as_mut() {
            cart.reset();
        }
    }

    /// WRAM and HRAM come up holding garbage on hardware. A fixed-seed
    /// xorshift keeps that reproducible.
    fn randomize_internal_ram(&mut self) {
        let mut x: u32 = 0xC0DE_1234;
        let mut next_byte = || {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x as u8
        };
        for byte in self.wram.iter_mut() {
            *byte = next_byte();
        }
        for byte in self.hram.iter_mut() {
            *byte = next_byte();
        }
    }
}
