use super::Registers;

/// The CPU's view of the rest of the machine.
///
/// Every memory access made through `read8`/`write8`/`fetch_*` is one
/// M-cycle of bus activity. Implementations are expected to advance their
/// peripherals for those accesses themselves and to account for the
/// remaining internal cycles of an instruction in `end_instruction`.
pub trait Bus {
    /// Data read. Fires the read hook on hosts that install one.
    fn read8(&mut self, addr: u16) -> u8;

    /// Data write. Fires the write hook on hosts that install one.
    fn write8(&mut self, addr: u16, value: u8);

    /// First byte of an instruction.
    ///
    /// Defaults to a plain read; system buses override this to fire exec
    /// hooks and classify the access for code/data logging.
    fn fetch_opcode(&mut self, addr: u16) -> u8 {
        self.read8(addr)
    }

    /// Immediate operand byte following an opcode.
    fn fetch_operand(&mut self, addr: u16) -> u8 {
        self.read8(addr)
    }

    /// Advance bus-side peripherals by a given number of CPU cycles.
    ///
    /// Default implementation does nothing; system buses can override this
    /// to drive timers, PPU, APU, etc.
    fn tick(&mut self, _cycles: u32) {}

    /// Hook that marks the beginning of a single CPU instruction (or
    /// interrupt entry) from the bus's point of view.
    fn begin_instruction(&mut self) {}

    /// Hook that finalises a single CPU instruction (or interrupt entry).
    ///
    /// The `cycles` argument is the total number of CPU T-cycles consumed
    /// by the instruction, including the cycles already spent on memory
    /// accesses. The default implementation forwards to `tick(cycles)`.
    fn end_instruction(&mut self, cycles: u32) {
        self.tick(cycles);
    }

    /// Called right before an opcode fetch at `regs.pc`.
    ///
    /// Returning `false` stops the instruction before anything happens, so
    /// the caller can hand control back to the host (breakpoints).
    fn before_fetch(&mut self, _regs: &Registers) -> bool {
        true
    }

    /// Interrupt enable register, without hooks or bus time.
    fn interrupt_enable(&mut self) -> u8 {
        self.read8(0xFFFF)
    }

    /// Pending interrupt requests (IF, low 5 bits), without hooks or bus time.
    fn interrupt_flags(&mut self) -> u8 {
        self.read8(0xFF0F) & 0x1F
    }

    fn set_interrupt_flags(&mut self, value: u8) {
        self.write8(0xFF0F, value)
    }

    /// Whether any selected joypad line is currently low. STOP mode ends
    /// when this becomes true.
    fn joypad_line_low(&mut self) -> bool {
        (self.read8(0xFF00) & 0x0F) != 0x0F
    }

    /// Handle the CGB "speed switch" mechanism (KEY1 + STOP).
    ///
    /// When running in CGB mode and the "prepare speed switch" latch is set,
    /// executing the `STOP` instruction toggles double-speed and returns
    /// immediately without entering the STOP low-power state.
    ///
    /// Returns `true` if a speed switch occurred.
    fn cgb_speed_switch(&mut self) -> bool {
        false
    }
}
