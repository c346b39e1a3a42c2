use super::Timer;

impl Timer {
    pub(in super::super) fn read_div(&self) -> u8 {
        (self.internal_counter >> 6) as u8
    }

    /// Any write clears the counter. If the selected bit was high this is a
    /// falling edge and TIMA ticks once.
    pub(in super::super) fn write_div(&mut self) {
        if self.input_signal() {
            self.increment_tima();
        }
        self.internal_counter = 0;
    }

    pub(in super::super) fn read_tima(&self) -> u8 {
        self.tima
    }

    /// A write in the cycle between overflow and reload cancels the reload
    /// and the interrupt.
    pub(in super::super) fn write_tima(&mut self, value: u8) {
        self.tima = value;
        self.overflow = false;
    }

    pub(in super::super) fn read_tma(&self) -> u8 {
        self.tma
    }

    /// A write during the reload window also lands in TIMA.
    pub(in super::super) fn write_tma(&mut self, value: u8) {
        self.tma = value;
        if self.overflow {
            self.tima = value;
        }
    }

    pub(in super::super) fn read_tac(&self) -> u8 {
        self.tac | 0xF8
    }

    pub(in super::super) fn write_tac(&mut self, value: u8) {
        let before = self.input_signal();
        self.tac = value & 0x07;
        if before && !self.input_signal() {
            self.increment_tima();
        }
    }
}
