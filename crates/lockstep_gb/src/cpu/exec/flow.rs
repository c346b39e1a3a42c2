use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// RET, or RETI when `enable_interrupts` is set. RETI enables IME
    /// immediately, without the EI delay.
    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B, enable_interrupts: bool) -> u32 {
        self.regs.pc = self.pop_u16(bus);
        if enable_interrupts {
            self.ime = true;
        }
        16
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, y: u8) -> u32 {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = (y as u16) * 8;
        16
    }
}
