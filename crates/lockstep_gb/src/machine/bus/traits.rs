use crate::cpu::{Bus, Registers};
use crate::machine::hooks::{CdlAddrKind, CdlFlags};

use super::GameBoyBus;

/// CPU cycles the CPU sits out after a KEY1 speed switch.
const SPEED_SWITCH_PAUSE: u32 = 8_200;

impl GameBoyBus {
    /// Classify `addr` for the code/data logger: physical offset plus the
    /// region it lands in.
    pub(crate) fn cdl_target(&self, addr: u16) -> (u32, CdlAddrKind) {
        match addr {
            0x0000..=0x7FFF if self.bios_covers(addr).is_none() => match &self.cartridge {
                Some(cart) => (cart.rom_offset(addr) as u32, CdlAddrKind::Rom),
                None => (0, CdlAddrKind::None),
            },
            0xA000..=0xBFFF => match self.cartridge.as_ref().and_then(|c| c.ram_offset(addr)) {
                Some(offset) => (offset as u32, CdlAddrKind::CartRam),
                None => (0, CdlAddrKind::None),
            },
            0xC000..=0xFDFF => (self.wram_offset(addr) as u32, CdlAddrKind::Wram),
            0xFF80..=0xFFFE => (u32::from(addr - 0xFF80), CdlAddrKind::Hram),
            _ => (0, CdlAddrKind::None),
        }
    }

    fn log_cdl(&mut self, addr: u16, flags: CdlFlags) {
        if self.hooks.cdl.is_none() {
            return;
        }
        let (offset, kind) = self.cdl_target(addr);
        self.hooks.on_cdl(offset, kind, flags);
    }

    /// One CPU access: the access itself, then one machine cycle.
    fn timed_read(&mut self, addr: u16) -> u8 {
        let value = self.read_mapped(addr);
        self.access_cycles += 4;
        self.advance(4);
        value
    }

    /// Raw access from the host: region side effects, no bus time.
    pub(crate) fn external_read(&mut self, addr: u16) -> u8 {
        if self.external_hooks {
            self.hooks.on_read(addr, self.run_cycles);
        }
        self.read_mapped(addr)
    }

    pub(crate) fn external_write(&mut self, addr: u16, value: u8) {
        if self.external_hooks {
            self.hooks.on_write(addr, self.run_cycles);
        }
        self.write_mapped(addr, value);
    }
}

impl Bus for GameBoyBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.hooks.on_read(addr, self.run_cycles);
        self.log_cdl(addr, CdlFlags::DATA);
        self.timed_read(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.hooks.on_write(addr, self.run_cycles);
        self.write_mapped(addr, value);
        self.access_cycles += 4;
        self.advance(4);
    }

    fn fetch_opcode(&mut self, addr: u16) -> u8 {
        self.hooks.on_exec(addr, self.run_cycles);
        self.log_cdl(addr, CdlFlags::EXEC_OPCODE);
        self.timed_read(addr)
    }

    fn fetch_operand(&mut self, addr: u16) -> u8 {
        self.hooks.on_read(addr, self.run_cycles);
        self.log_cdl(addr, CdlFlags::EXEC_OPERAND);
        self.timed_read(addr)
    }

    fn tick(&mut self, cycles: u32) {
        self.advance(cycles);
    }

    fn begin_instruction(&mut self) {
        self.access_cycles = 0;
    }

    fn end_instruction(&mut self, cycles: u32) {
        // Memory accesses already moved time forward; only the internal
        // cycles of the instruction are left.
        let internal = cycles.saturating_sub(self.access_cycles);
        self.advance(internal);

        // VRAM DMA halts the CPU while the rest of the machine runs.
        let stall = std::mem::take(&mut self.stall_cycles);
        self.advance(stall);

        let pause = std::mem::take(&mut self.speed_switch_pause);
        self.advance_with_timer(pause, false);
    }

    fn before_fetch(&mut self, regs: &Registers) -> bool {
        let bank = self.active_bank(regs.pc);
        if self.debugger.check(bank, regs.pc) {
            return false;
        }
        self.hooks.on_trace(regs);
        true
    }

    fn interrupt_enable(&mut self) -> u8 {
        self.ie_reg
    }

    fn interrupt_flags(&mut self) -> u8 {
        self.if_reg & 0x1F
    }

    fn set_interrupt_flags(&mut self, value: u8) {
        self.if_reg = value & 0x1F;
    }

    fn joypad_line_low(&mut self) -> bool {
        self.any_line_low()
    }

    fn cgb_speed_switch(&mut self) -> bool {
        if !self.cgb() || !self.key1_armed {
            return false;
        }
        self.key1_armed = false;
        self.double_speed = !self.double_speed;
        self.speed_switch_pause = SPEED_SWITCH_PAUSE;
        log::debug!("CGB speed switch: double speed {}", self.double_speed);
        true
    }
}
