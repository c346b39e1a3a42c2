//! Sharp LR35902 core.
//!
//! The core executes whole instructions and reports how many T-cycles each
//! one took. Memory accesses go through [`Bus`], which is responsible for
//! keeping the rest of the machine in step with them.

mod alu;
mod bus;
mod cb;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod state;
mod step;

pub use bus::Bus;
pub use init::BootRegisters;
pub use regs::{Flag, Registers, REGISTER_SLOTS};

/// Game Boy CPU core.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub ime: bool,
    pub halted: bool,
    /// STOP low-power state. While `stopped` is true, the CPU ignores maskable
    /// interrupts and only resumes execution when a joypad input line goes
    /// low.
    stopped: bool,
    halt_bug: bool,
    ime_enable_pending: bool,
    ime_enable_delay: bool,
    /// Set after an invalid opcode. The core idles until reset.
    locked: bool,
}

#[cfg(test)]
mod tests;
