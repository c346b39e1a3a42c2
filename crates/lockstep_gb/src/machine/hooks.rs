use bitflags::bitflags;

use crate::cpu::Registers;

bitflags! {
    /// Joypad state as returned by the host input getter. A set bit means
    /// the button is held.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct Buttons: u8 {
        const A = 0x01;
        const B = 0x02;
        const SELECT = 0x04;
        const START = 0x08;
        const RIGHT = 0x10;
        const LEFT = 0x20;
        const UP = 0x40;
        const DOWN = 0x80;
    }
}

bitflags! {
    /// How the CPU touched a byte, for code/data logging.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct CdlFlags: u8 {
        const EXEC_OPCODE = 0x01;
        const EXEC_OPERAND = 0x02;
        const DATA = 0x04;
    }
}

/// Physical region an access resolved to, paired with an offset into that
/// region when reported to the code/data logger.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CdlAddrKind {
    Rom,
    Hram,
    Wram,
    CartRam,
    /// Anything else (VRAM, OAM, I/O, disabled cart RAM).
    None,
}

/// When the scanline callback fires.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScanlineTrigger {
    EveryLine,
    Line(u8),
}

impl ScanlineTrigger {
    fn matches(self, ly: u8) -> bool {
        match self {
            ScanlineTrigger::EveryLine => true,
            ScanlineTrigger::Line(line) => line == ly,
        }
    }
}

/// The per-line registers a scanline callback may inspect and rewrite
/// before the line is drawn.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LineRegisters {
    pub scy: u8,
    pub scx: u8,
    pub wy: u8,
    pub wx: u8,
    pub bgp: u8,
    pub obp0: u8,
    pub obp1: u8,
}

pub type MemoryCallback = Box<dyn FnMut(u16, u64)>;
pub type InputGetter = Box<dyn FnMut() -> Buttons>;
pub type CdlCallback = Box<dyn FnMut(u32, CdlAddrKind, CdlFlags)>;
pub type TraceCallback = Box<dyn FnMut(&Registers)>;
pub type ScanlineCallback = Box<dyn FnMut(u8, &mut LineRegisters)>;
pub type LinkCallback = Box<dyn FnMut()>;

/// Host callbacks. One slot per kind; an empty slot is skipped.
#[derive(Default)]
pub(crate) struct Hooks {
    pub(crate) input: Option<InputGetter>,
    pub(crate) read: Option<MemoryCallback>,
    pub(crate) write: Option<MemoryCallback>,
    pub(crate) exec: Option<MemoryCallback>,
    pub(crate) cdl: Option<CdlCallback>,
    pub(crate) trace: Option<TraceCallback>,
    pub(crate) scanline: Option<(ScanlineTrigger, ScanlineCallback)>,
    pub(crate) link: Option<LinkCallback>,
}

impl Hooks {
    pub(crate) fn poll_input(&mut self) -> Option<Buttons> {
        self.input.as_mut().map(|getter| getter())
    }

    pub(crate) fn on_read(&mut self, addr: u16, cycle_offset: u64) {
        if let Some(cb) = self.read.as_mut() {
            cb(addr, cycle_offset);
        }
    }

    pub(crate) fn on_write(&mut self, addr: u16, cycle_offset: u64) {
        if let Some(cb) = self.write.as_mut() {
            cb(addr, cycle_offset);
        }
    }

    pub(crate) fn on_exec(&mut self, addr: u16, cycle_offset: u64) {
        if let Some(cb) = self.exec.as_mut() {
            cb(addr, cycle_offset);
        }
    }

    pub(crate) fn on_cdl(&mut self, offset: u32, kind: CdlAddrKind, flags: CdlFlags) {
        if kind == CdlAddrKind::None {
            return;
        }
        if let Some(cb) = self.cdl.as_mut() {
            cb(offset, kind, flags);
        }
    }

    pub(crate) fn on_trace(&mut self, regs: &Registers) {
        if let Some(cb) = self.trace.as_mut() {
            cb(regs);
        }
    }

    pub(crate) fn on_link(&mut self) {
        if let Some(cb) = self.link.as_mut() {
            cb();
        }
    }

    /// Runs the scanline callback for `ly` if its trigger matches, letting
    /// it rewrite `regs` in place.
    pub(crate) fn on_scanline(&mut self, ly: u8, regs: &mut LineRegisters) -> bool {
        match self.scanline.as_mut() {
            Some((trigger, cb)) if trigger.matches(ly) => {
                cb(ly, regs);
                true
            }
            _ => false,
        }
    }
}
