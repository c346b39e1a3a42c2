use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) -> u32 {
        // STOP is a 2-byte instruction; the padding byte is discarded.
        let _padding = self.fetch8(bus);

        if bus.cgb_speed_switch() {
            self.stopped = false;
            self.halted = false;
            return 4;
        }
        self.stopped = true;
        self.halted = false;
        4
    }

    pub(super) fn exec_halt<B: Bus>(&mut self, bus: &mut B) -> u32 {
        // With IME clear and an interrupt already pending the CPU does not
        // halt, and the next opcode fetch fails to advance PC.
        if !self.ime && bus.interrupt_enable() & bus.interrupt_flags() & 0x1F != 0 {
            self.halt_bug = true;
            return 4;
        }
        self.halted = true;
        4
    }

    pub(super) fn exec_di(&mut self) -> u32 {
        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        4
    }

    pub(super) fn exec_ei(&mut self) -> u32 {
        // IME becomes 1 after the *next* instruction completes.
        self.ime_enable_pending = true;
        4
    }
}
