use super::super::{Bus, Cpu};
use super::poll::VECTOR_BASE;

impl Cpu {
    /// Dispatch a maskable interrupt if one is due.
    ///
    /// Returns `Some(cycles)` if an interrupt was taken, or `None` otherwise.
    pub(in crate::cpu) fn handle_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        if !self.interrupt_ready(bus) {
            return None;
        }

        self.ime = false;
        self.halted = false;

        let [hi, lo] = self.regs.pc.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);

        // Writes by the low-byte push come too late to change the target.
        let selection = self.select_interrupt(bus);

        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);

        match selection {
            Some((index, remaining)) => {
                let vector = VECTOR_BASE + index as u16 * 8;
                log::debug!(
                    "GB CPU interrupt: idx={} vector=0x{:04X} pc=0x{:04X} sp=0x{:04X}",
                    index,
                    vector,
                    u16::from_be_bytes([hi, lo]),
                    self.regs.sp,
                );
                bus.set_interrupt_flags(remaining);
                self.regs.pc = vector;
            }
            None => {
                // The request vanished during the push: the dispatch is
                // cancelled and execution continues at 0x0000.
                self.regs.pc = 0x0000;
            }
        }

        Some(20)
    }
}
