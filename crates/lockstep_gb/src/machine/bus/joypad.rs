use super::{GameBoyBus, JOYPAD_IRQ};
use crate::machine::hooks::Buttons;

impl GameBoyBus {
    /// Poll the host input getter. A button that goes down on a selected
    /// line requests the joypad interrupt.
    pub(super) fn refresh_input(&mut self) {
        let Some(now) = self.hooks.poll_input() else {
            return;
        };
        let pressed = now & !self.buttons;
        self.buttons = now;
        if self.selected_lines(pressed) != 0 {
            self.if_reg |= JOYPAD_IRQ;
        }
    }

    /// Low nibble of the selected groups for `buttons`, 1 = held.
    fn selected_lines(&self, buttons: Buttons) -> u8 {
        let bits = buttons.bits();
        let mut lines = 0;
        if self.joyp_select & 0x10 == 0 {
            lines |= bits >> 4;
        }
        if self.joyp_select & 0x20 == 0 {
            lines |= bits & 0x0F;
        }
        lines
    }

    pub(super) fn read_joyp(&mut self) -> u8 {
        self.refresh_input();
        // A held button pulls its line low.
        0xC0 | self.joyp_select | (!self.selected_lines(self.buttons) & 0x0F)
    }

    pub(super) fn write_joyp(&mut self, value: u8) {
        self.joyp_select = value & 0x30;
    }

    pub(super) fn any_line_low(&mut self) -> bool {
        self.refresh_input();
        self.selected_lines(self.buttons) != 0
    }
}
