use super::{Cpu, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

/// Which register set the boot ROM leaves behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootRegisters {
    Dmg,
    Cgb,
    /// CGB boot ROM running on a GBA.
    Gba,
}

impl Cpu {
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            ime: false,
            halted: false,
            stopped: false,
            halt_bug: false,
            ime_enable_pending: false,
            ime_enable_delay: false,
            locked: false,
        };
        cpu.apply_boot_state(BootRegisters::Dmg);
        cpu
    }

    /// Reset to the state the boot ROM hands over at 0x0100.
    pub fn reset(&mut self, boot: BootRegisters) {
        self.clear_control_state();
        self.apply_boot_state(boot);
    }

    /// Reset to the power-on state used when a boot ROM is executed.
    pub fn reset_for_bios(&mut self) {
        self.clear_control_state();
        self.regs = Registers::default();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn clear_control_state(&mut self) {
        self.ime = false;
        self.halted = false;
        self.stopped = false;
        self.halt_bug = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        self.locked = false;
    }

    /// Register values after the boot ROM, per Pan Docs.
    fn apply_boot_state(&mut self, boot: BootRegisters) {
        let regs = &mut self.regs;
        match boot {
            BootRegisters::Dmg => {
                regs.a = 0x01;
                regs.f = 0xB0;
                regs.b = 0x00;
                regs.c = 0x13;
                regs.d = 0x00;
                regs.e = 0xD8;
                regs.h = 0x01;
                regs.l = 0x4D;
            }
            BootRegisters::Cgb | BootRegisters::Gba => {
                regs.a = 0x11;
                regs.f = 0x80;
                regs.b = 0x00;
                regs.c = 0x00;
                regs.d = 0xFF;
                regs.e = 0x56;
                regs.h = 0x00;
                regs.l = 0x0D;
                if boot == BootRegisters::Gba {
                    regs.b = 0x01;
                    regs.f = 0x00;
                }
            }
        }
        regs.sp = 0xFFFE;
        regs.pc = 0x0100;
    }
}
