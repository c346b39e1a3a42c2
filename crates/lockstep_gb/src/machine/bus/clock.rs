use super::GameBoyBus;
use crate::machine::video::PpuEvents;

impl GameBoyBus {
    /// Advance every unit by `cpu_cycles` CPU cycles.
    pub(super) fn advance(&mut self, cpu_cycles: u32) {
        self.advance_with_timer(cpu_cycles, true);
    }

    /// Same as `advance`, with the divider optionally frozen (speed switch
    /// pause).
    pub(super) fn advance_with_timer(&mut self, cpu_cycles: u32, timer: bool) {
        if cpu_cycles == 0 {
            return;
        }
        self.cycles += u64::from(cpu_cycles);
        self.run_cycles += u64::from(cpu_cycles);

        if timer {
            self.timer.tick(cpu_cycles, &mut self.if_reg);
        }
        if self.serial.tick(cpu_cycles, &mut self.if_reg) {
            self.hooks.on_link();
        }

        // Video, audio and the RTC run on real time, which is half the CPU
        // clock in double speed.
        let real = if self.double_speed {
            let total = u32::from(self.speed_subcycle) + cpu_cycles;
            self.speed_subcycle = (total & 1) as u8;
            total / 2
        } else {
            cpu_cycles
        };
        for _ in 0..real {
            self.real_cycle();
        }
        if let Some(cart) = self.cartridge.as_mut() {
            cart.tick(real);
        }
    }

    fn real_cycle(&mut self) {
        let events = self.ppu.cycle(&mut self.if_reg);
        if !events.is_empty() {
            self.handle_ppu_events(events);
        }
        self.apu.tick(1);
    }

    fn handle_ppu_events(&mut self, events: PpuEvents) {
        if events.contains(PpuEvents::LINE_START) && self.hooks.scanline.is_some() {
            let ly = self.ppu.ly;
            let mut regs = self.ppu.line_registers();
            if self.hooks.on_scanline(ly, &mut regs) {
                self.ppu.apply_line_registers(&regs);
            }
        }
        if events.contains(PpuEvents::FRAME_DONE) {
            self.frame_sample = Some(self.apu.samples.len());
        }
        if events.contains(PpuEvents::HBLANK) {
            self.on_hblank();
        }
    }
}
