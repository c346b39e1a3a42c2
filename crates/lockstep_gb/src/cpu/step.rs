use super::{Bus, Cpu};

impl Cpu {
    /// Execute a single instruction, interrupt dispatch or idle slot and
    /// return the number of T-cycles taken.
    ///
    /// Returns 0 only when [`Bus::before_fetch`] declined the next
    /// instruction; nothing was executed and no time passed in that case.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        bus.begin_instruction();

        if self.locked {
            // Keep time moving so the rest of the machine stays live.
            bus.end_instruction(4);
            return 4;
        }

        if self.stopped {
            if bus.joypad_line_low() {
                self.stopped = false;
            }
            bus.end_instruction(4);
            return 4;
        }

        if let Some(cycles) = self.handle_interrupts(bus) {
            bus.end_instruction(cycles);
            return cycles;
        }

        if self.halted {
            bus.end_instruction(4);
            return 4;
        }

        if !bus.before_fetch(&self.regs) {
            bus.end_instruction(0);
            return 0;
        }

        let opcode = self.fetch_opcode(bus);
        let cycles = self.exec_opcode(bus, opcode);

        bus.end_instruction(cycles);
        self.apply_ime_delay();
        cycles
    }
}
