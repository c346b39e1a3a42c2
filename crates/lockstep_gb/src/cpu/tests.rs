use super::*;

struct TestBus {
    memory: [u8; 0x10000],
    opcode_fetches: Vec<u16>,
    operand_fetches: Vec<u16>,
    stop_at: Option<u16>,
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
            opcode_fetches: Vec::new(),
            operand_fetches: Vec::new(),
            stop_at: None,
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    fn fetch_opcode(&mut self, addr: u16) -> u8 {
        self.opcode_fetches.push(addr);
        self.memory[addr as usize]
    }

    fn fetch_operand(&mut self, addr: u16) -> u8 {
        self.operand_fetches.push(addr);
        self.memory[addr as usize]
    }

    fn before_fetch(&mut self, regs: &Registers) -> bool {
        self.stop_at != Some(regs.pc)
    }
}

fn cpu_at(pc: u16) -> Cpu {
    let mut cpu = Cpu::new();
    cpu.regs.pc = pc;
    cpu
}

#[test]
fn nop_advances_pc() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();

    let cycles = cpu.step(&mut bus);

    assert_eq!(cpu.regs.pc, 0x0001);
    assert_eq!(cycles, 4);
}

#[test]
fn power_on_registers_match_boot_rom_hand_off() {
    let mut cpu = Cpu::new();
    assert_eq!(
        cpu.regs.to_array(),
        [0x0100, 0xFFFE, 0x01, 0x00, 0x13, 0x00, 0xD8, 0xB0, 0x01, 0x4D]
    );

    cpu.reset(BootRegisters::Cgb);
    assert_eq!(
        cpu.regs.to_array(),
        [0x0100, 0xFFFE, 0x11, 0x00, 0x00, 0xFF, 0x56, 0x80, 0x00, 0x0D]
    );

    cpu.reset(BootRegisters::Gba);
    assert_eq!(cpu.regs.b, 0x01);
    assert_eq!(cpu.regs.a, 0x11);
}

#[test]
fn register_array_round_trips_and_masks_f() {
    let values = [0x1234, 0xC000, 0x01, 0x02, 0x03, 0x04, 0x05, 0xF0, 0x07, 0x08];
    let regs = Registers::from_array(&values);
    assert_eq!(regs.to_array(), values);

    let mut dirty = values;
    dirty[7] = 0xFF;
    assert_eq!(Registers::from_array(&dirty).f, 0xF0);
}

#[test]
fn opcode_and_operand_fetches_are_reported_separately() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // LD BC, 0x1234
    bus.memory[0x0000] = 0x01;
    bus.memory[0x0001] = 0x34;
    bus.memory[0x0002] = 0x12;

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.bc(), 0x1234);
    assert_eq!(bus.opcode_fetches, vec![0x0000]);
    assert_eq!(bus.operand_fetches, vec![0x0001, 0x0002]);
}

#[test]
fn ld_indirect_hl_increment_and_decrement() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // LD (HL+),A ; LD (HL-),A ; LD A,(HL+)
    bus.memory[0x0000] = 0x22;
    bus.memory[0x0001] = 0x32;
    bus.memory[0x0002] = 0x2A;
    cpu.regs.set_hl(0xC000);
    cpu.regs.a = 0x5A;

    cpu.step(&mut bus);
    assert_eq!(bus.memory[0xC000], 0x5A);
    assert_eq!(cpu.regs.hl(), 0xC001);

    cpu.step(&mut bus);
    assert_eq!(bus.memory[0xC001], 0x5A);
    assert_eq!(cpu.regs.hl(), 0xC000);

    cpu.regs.a = 0;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x5A);
    assert_eq!(cpu.regs.hl(), 0xC001);
}

#[test]
fn inc_dec_preserve_carry() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // INC B ; DEC B
    bus.memory[0x0000] = 0x04;
    bus.memory[0x0001] = 0x05;
    cpu.regs.b = 0x0F;
    cpu.regs.f = 0x10;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.b, 0x10);
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.b, 0x0F);
    assert!(cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn push_pop_af_masks_low_flag_bits() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // POP AF
    bus.memory[0x0000] = 0xF1;
    cpu.regs.sp = 0xFFFC;
    bus.memory[0xFFFC] = 0x3F;
    bus.memory[0xFFFD] = 0x12;

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.f, 0x30);
}

#[test]
fn add_and_sub_set_half_carry_and_carry() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // ADD A,0x01 ; SUB 0x20
    bus.memory[0x0000] = 0xC6;
    bus.memory[0x0001] = 0x01;
    bus.memory[0x0002] = 0xD6;
    bus.memory[0x0003] = 0x20;
    cpu.regs.a = 0xFF;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xE0);
    assert!(cpu.get_flag(Flag::N));
    assert!(!cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn daa_corrects_bcd_addition() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // ADD A,0x27 ; DAA
    bus.memory[0x0000] = 0xC6;
    bus.memory[0x0001] = 0x27;
    bus.memory[0x0002] = 0x27;
    cpu.regs.a = 0x15;

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x42);
    assert!(!cpu.get_flag(Flag::C));
}

#[test]
fn rla_clears_zero_flag() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // RLA
    bus.memory[0x0000] = 0x17;
    cpu.regs.a = 0x80;
    cpu.regs.f = 0x00;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(!cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn cb_swap_bit_and_set_on_hl() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // SWAP (HL) ; BIT 7,(HL) ; SET 0,(HL)
    bus.memory[0x0000..0x0006].copy_from_slice(&[0xCB, 0x36, 0xCB, 0x7E, 0xCB, 0xC6]);
    cpu.regs.set_hl(0xC100);
    bus.memory[0xC100] = 0x1F;

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.memory[0xC100], 0xF1);

    assert_eq!(cpu.step(&mut bus), 12);
    assert!(!cpu.get_flag(Flag::Z));

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.memory[0xC100], 0xF1);
}

#[test]
fn conditional_branches_report_taken_and_untaken_cost() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // JR NZ,+2 (taken) ; ... ; JP Z,0x1234 (not taken)
    bus.memory[0x0000] = 0x20;
    bus.memory[0x0001] = 0x02;
    bus.memory[0x0004] = 0xCA;
    bus.memory[0x0005] = 0x34;
    bus.memory[0x0006] = 0x12;
    cpu.regs.f = 0x00;

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0004);

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0007);
}

#[test]
fn call_and_ret_round_trip() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // CALL 0x0010 ; at 0x0010: RET
    bus.memory[0x0000] = 0xCD;
    bus.memory[0x0001] = 0x10;
    bus.memory[0x0002] = 0x00;
    bus.memory[0x0010] = 0xC9;
    cpu.regs.sp = 0xFFFE;

    assert_eq!(cpu.step(&mut bus), 24);
    assert_eq!(cpu.regs.pc, 0x0010);
    assert_eq!(cpu.regs.sp, 0xFFFC);

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0003);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn ei_sets_ime_after_next_instruction() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // EI ; NOP
    bus.memory[0x0000] = 0xFB;

    cpu.step(&mut bus);
    assert!(!cpu.ime);
    cpu.step(&mut bus);
    assert!(cpu.ime);
}

#[test]
fn interrupt_dispatch_pushes_pc_and_clears_request() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::default();
    cpu.regs.sp = 0xD000;
    cpu.ime = true;
    bus.memory[0xFFFF] = 0x04;
    bus.memory[0xFF0F] = 0x04;

    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(cpu.regs.pc, 0x0050);
    assert!(!cpu.ime);
    assert_eq!(bus.memory[0xFF0F] & 0x1F, 0x00);
    assert_eq!(bus.memory[0xCFFF], 0x02);
    assert_eq!(bus.memory[0xCFFE], 0x00);
}

#[test]
fn halt_bug_repeats_next_opcode_byte() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    // HALT ; INC A
    bus.memory[0x0000] = 0x76;
    bus.memory[0x0001] = 0x3C;
    bus.memory[0xFFFF] = 0x01;
    bus.memory[0xFF0F] = 0x01;
    cpu.regs.a = 0;
    cpu.ime = false;

    cpu.step(&mut bus);
    assert!(!cpu.halted);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 2);
    assert_eq!(cpu.regs.pc, 0x0002);
}

#[test]
fn halt_wakes_without_ime_when_interrupt_arrives() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    bus.memory[0x0000] = 0x76;
    bus.memory[0xFFFF] = 0x01;
    cpu.ime = false;

    cpu.step(&mut bus);
    assert!(cpu.halted);
    assert_eq!(cpu.step(&mut bus), 4);
    assert!(cpu.halted);

    // Wakes up and runs the NOP after the HALT without dispatching.
    bus.memory[0xFF0F] = 0x01;
    cpu.step(&mut bus);
    assert!(!cpu.halted);
    assert_eq!(cpu.regs.pc, 0x0002);
}

#[test]
fn invalid_opcode_locks_but_keeps_consuming_time() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    bus.memory[0x0000] = 0xD3;

    cpu.step(&mut bus);
    assert!(cpu.is_locked());
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0001);
}

#[test]
fn declined_fetch_executes_nothing() {
    let mut cpu = cpu_at(0x0000);
    let mut bus = TestBus::default();
    bus.memory[0x0000] = 0x3C;
    bus.stop_at = Some(0x0000);
    cpu.regs.a = 0;

    assert_eq!(cpu.step(&mut bus), 0);
    assert_eq!(cpu.regs.pc, 0x0000);
    assert_eq!(cpu.regs.a, 0);
    assert!(bus.opcode_fetches.is_empty());
}
