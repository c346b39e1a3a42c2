use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{
    BankSelector, Breakpoint, Buttons, CdlAddrKind, CdlFlags, DmgPalette, GameBoy, GameBoyModel,
    LoadFlags, MemoryArea, MulticartDetector, ScanlineTrigger, TimeMode,
};
use crate::{LoadError, StateError, MAX_OVERSHOOT_SAMPLES, SAMPLES_PER_FRAME};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

const BANK: usize = 0x4000;

/// Cartridge image whose entry point jumps to a `JR -2` spin at 0x0150.
/// Every bank starts with its own bank number.
fn rom_image(cart_type: u8, banks: usize, ram_code: u8) -> Vec<u8> {
    let mut rom = vec![0u8; banks * BANK];
    for bank in 0..banks {
        rom[bank * BANK] = bank as u8;
    }
    rom[0x134..0x138].copy_from_slice(b"TEST");
    rom[0x147] = cart_type;
    rom[0x149] = ram_code;
    // NOP; JP 0x0150
    rom[0x100..0x104].copy_from_slice(&[0x00, 0xC3, 0x50, 0x01]);
    rom[0x150..0x152].copy_from_slice(&[0x18, 0xFE]);
    rom
}

fn with_program(mut rom: Vec<u8>, program: &[u8]) -> Vec<u8> {
    rom[0x150..0x150 + program.len()].copy_from_slice(program);
    rom
}

fn loaded(rom: &[u8]) -> GameBoy {
    let mut gb = GameBoy::new();
    gb.load(rom, LoadFlags::empty()).expect("load");
    gb
}

fn audio_buffer() -> Vec<u32> {
    vec![0; SAMPLES_PER_FRAME + MAX_OVERSHOOT_SAMPLES]
}

fn run_frame(gb: &mut GameBoy) -> (isize, usize) {
    let mut audio = audio_buffer();
    let mut samples = SAMPLES_PER_FRAME;
    let at = gb.run_for(&mut audio, &mut samples);
    (at, samples)
}

fn frame(gb: &GameBoy) -> Vec<u32> {
    let mut pixels = vec![0; SCREEN_WIDTH * SCREEN_HEIGHT];
    gb.blit_to(Some(&mut pixels), SCREEN_WIDTH);
    pixels
}

#[test]
fn load_reports_header_facts() {
    let mut gb = GameBoy::new();
    assert!(!gb.is_loaded());
    assert_eq!(gb.rom_title(), None);

    gb.load(&rom_image(0x00, 2, 0), LoadFlags::empty())
        .expect("load");
    assert!(gb.is_loaded());
    assert_eq!(gb.rom_title(), Some("TEST"));
    assert_eq!(gb.model(), GameBoyModel::Dmg);
    assert!(!gb.is_cgb());
    assert!(!gb.is_cgb_dmg());
}

#[test]
fn load_rejects_bad_images() {
    let mut gb = GameBoy::new();

    let err = gb.load(&[0u8; 0x100], LoadFlags::empty()).unwrap_err();
    assert_eq!(err, LoadError::InvalidImage(0x100));
    assert!(err.code() < 0);

    let err = gb
        .load(&rom_image(0x22, 2, 0), LoadFlags::empty())
        .unwrap_err();
    assert_eq!(err, LoadError::UnsupportedMapper(0x22));
    assert!(!gb.is_loaded());

    let err = gb.load_bios(&[0u8; 10]).unwrap_err();
    assert_eq!(err, LoadError::BiosMismatch(10));
    assert_ne!(LoadError::InvalidImage(0).code(), err.code());
}

#[test]
fn failed_load_keeps_previous_cartridge() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    assert!(gb.load(&rom_image(0x22, 2, 0), LoadFlags::empty()).is_err());
    assert_eq!(gb.rom_title(), Some("TEST"));
}

#[test]
fn power_on_state_matches_boot_rom_hand_off() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));

    assert_eq!(
        gb.get_regs(),
        [0x0100, 0xFFFE, 0x01, 0x00, 0x13, 0x00, 0xD8, 0xB0, 0x01, 0x4D]
    );
    assert_eq!(gb.external_read(0xFF04), 0xAB);
    assert_eq!(gb.external_read(0xFF40), 0x91);
    assert_eq!(gb.external_read(0xFF47), 0xFC);
}

#[test]
fn cgb_flags_select_the_model() {
    let mut gb = GameBoy::new();
    gb.load(&rom_image(0x00, 2, 0), LoadFlags::CGB_MODE)
        .expect("load");
    assert!(gb.is_cgb());
    assert!(gb.is_cgb_dmg());
    assert_eq!(gb.get_regs()[2], 0x11);

    let mut rom = rom_image(0x00, 2, 0);
    rom[0x143] = 0x80;
    gb.load(&rom, LoadFlags::CGB_MODE | LoadFlags::GBA_FLAG)
        .expect("load");
    assert_eq!(gb.model(), GameBoyModel::Cgb);
    assert!(!gb.is_cgb_dmg());
    let regs = gb.get_regs();
    assert_eq!(regs[2], 0x11);
    assert_eq!(regs[3], 0x01);
    assert_eq!(regs[7], 0x00);

    // A CGB-only cartridge does not run on DMG hardware.
    rom[0x143] = 0xC0;
    gb.load(&rom, LoadFlags::empty()).expect("load");
    assert_eq!(gb.model(), GameBoyModel::Cgb);
}

#[test]
fn boot_rom_runs_until_ff50_is_written() {
    let mut bios = vec![0u8; 0x100];
    // LD A,1; LDH (0x50),A at the very end, falling through to 0x0100.
    bios[0xFC..].copy_from_slice(&[0x3E, 0x01, 0xE0, 0x50]);

    let mut rom = rom_image(0x00, 2, 0);
    rom[0] = 0xAA;

    let mut gb = GameBoy::new();
    gb.load_bios(&bios).expect("bios");
    gb.load(&rom, LoadFlags::empty()).expect("load");

    assert_eq!(gb.get_regs()[0], 0x0000);
    assert_eq!(gb.external_read(0x0000), 0x00);

    let execs = Rc::new(RefCell::new(Vec::new()));
    let sink = execs.clone();
    gb.set_exec_callback(Some(Box::new(move |addr, _| sink.borrow_mut().push(addr))));

    let mut audio = audio_buffer();
    let mut samples = 1_000;
    gb.run_for(&mut audio, &mut samples);

    assert_eq!(gb.external_read(0x0000), 0xAA);
    assert!(execs.borrow().contains(&0x0100));

    // NO_BIOS skips it even though it is loaded.
    gb.load(&rom, LoadFlags::NO_BIOS).expect("load");
    assert_eq!(gb.get_regs()[0], 0x0100);
    assert_eq!(gb.external_read(0x0000), 0xAA);
}

#[test]
fn run_for_stops_at_sample_count_without_a_frame() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    let mut audio = audio_buffer();
    let mut samples = 1_000;
    assert_eq!(gb.run_for(&mut audio, &mut samples), -1);
    assert!(samples >= 1_000);
    assert!(samples <= 1_000 + MAX_OVERSHOOT_SAMPLES);
}

#[test]
fn run_for_returns_at_each_completed_frame() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));

    // The first VBlank comes 144 lines after power-on, before a full
    // frame's worth of samples.
    let (first_at, first_produced) = run_frame(&mut gb);
    assert!(first_at >= 0);
    assert!((first_at as usize) < first_produced);
    assert!(first_produced < SAMPLES_PER_FRAME);
    assert!(first_produced - first_at as usize <= MAX_OVERSHOOT_SAMPLES);

    let (second_at, second_produced) = run_frame(&mut gb);
    assert!(second_at >= 0);
    assert!((second_at as usize) < second_produced);
    // Frames are exactly one frame's worth of samples apart.
    assert_eq!(
        first_produced - first_at as usize + second_at as usize,
        SAMPLES_PER_FRAME
    );
}

#[test]
fn run_for_never_runs_past_a_frame() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    let vblanks = Rc::new(Cell::new(0));
    let counter = vblanks.clone();
    gb.set_scanline_callback(
        Some(Box::new(move |ly, _| {
            if ly == 144 {
                counter.set(counter.get() + 1);
            }
        })),
        ScanlineTrigger::EveryLine,
    );

    let mut audio = vec![0; 3 * SAMPLES_PER_FRAME + MAX_OVERSHOOT_SAMPLES];
    for expected in 1..=3 {
        let mut samples = 3 * SAMPLES_PER_FRAME;
        let at = gb.run_for(&mut audio, &mut samples);
        assert!(at >= 0);
        assert!(samples < 3 * SAMPLES_PER_FRAME);
        assert_eq!(vblanks.get(), expected);
    }
}

#[test]
fn run_for_copies_only_what_fits() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    let mut audio = vec![0xDEAD_BEEF; 16];
    let mut samples = 100;
    gb.run_for(&mut audio, &mut samples);
    assert!(samples >= 100);
}

#[test]
fn run_for_without_cartridge_is_silent() {
    let mut gb = GameBoy::new();
    let mut audio = vec![0xFFFF_FFFF; 64];
    let mut samples = 64;
    assert_eq!(gb.run_for(&mut audio, &mut samples), -1);
    assert_eq!(samples, 0);
    assert!(audio.iter().all(|&s| s == 0));
}

#[test]
fn breakpoint_stops_and_resumes_past_itself() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    gb.set_interrupt_addresses(&[Breakpoint::any_bank(0x0150)]);

    let mut audio = audio_buffer();
    let mut samples = SAMPLES_PER_FRAME;
    assert_eq!(gb.run_for(&mut audio, &mut samples), -1);
    // NOP + JP: 20 cycles.
    assert_eq!(samples, 10);
    assert_eq!(gb.get_hit_interrupt_address(), Some(0x0150));
    assert_eq!(gb.get_regs()[0], 0x0150);

    // The spin jumps straight back, so the next stop is one JR later.
    let mut samples = SAMPLES_PER_FRAME;
    gb.run_for(&mut audio, &mut samples);
    assert_eq!(samples, 6);
    assert_eq!(gb.get_hit_interrupt_address(), Some(0x0150));

    gb.set_interrupt_addresses(&[]);
    let (at, _) = run_frame(&mut gb);
    assert!(at >= 0);
    assert_eq!(gb.get_hit_interrupt_address(), None);
}

#[test]
fn breakpoint_bank_must_match() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    gb.set_interrupt_addresses(&[Breakpoint::new(BankSelector::Bank(3), 0x0150)]);
    let (at, _) = run_frame(&mut gb);
    assert!(at >= 0);
    assert_eq!(gb.get_hit_interrupt_address(), None);

    gb.set_interrupt_addresses(&[Breakpoint::new(BankSelector::Bank(0), 0x0150)]);
    run_frame(&mut gb);
    assert_eq!(gb.get_hit_interrupt_address(), Some(0x0150));
}

#[test]
fn packed_breakpoints_treat_bank_zero_as_any() {
    assert_eq!(Breakpoint::from_packed(0x0000_0150), Breakpoint::any_bank(0x0150));
    let bp = Breakpoint::from_packed(0x0003_4000);
    assert_eq!(bp, Breakpoint::new(BankSelector::Bank(3), 0x4000));
    assert_eq!(bp.to_packed(), 0x0003_4000);
}

#[test]
fn exec_and_read_hooks_see_cycle_offsets() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));

    let execs = Rc::new(RefCell::new(Vec::new()));
    let reads = Rc::new(RefCell::new(Vec::new()));
    let exec_sink = execs.clone();
    let read_sink = reads.clone();
    gb.set_exec_callback(Some(Box::new(move |addr, at| {
        exec_sink.borrow_mut().push((addr, at))
    })));
    gb.set_read_callback(Some(Box::new(move |addr, at| {
        read_sink.borrow_mut().push((addr, at))
    })));

    let mut audio = audio_buffer();
    let mut samples = 20;
    gb.run_for(&mut audio, &mut samples);

    assert_eq!(
        execs.borrow()[..3],
        [(0x0100, 0), (0x0101, 4), (0x0150, 20)]
    );
    assert_eq!(reads.borrow()[..2], [(0x0102, 8), (0x0103, 12)]);
}

#[test]
fn trace_and_cdl_hooks_fire_per_instruction() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));

    let traced = Rc::new(RefCell::new(Vec::new()));
    let trace_sink = traced.clone();
    gb.set_trace_callback(Some(Box::new(move |regs| trace_sink.borrow_mut().push(regs.pc))));

    let logged = Rc::new(RefCell::new(Vec::new()));
    let cdl_sink = logged.clone();
    gb.set_cd_callback(Some(Box::new(move |offset, kind, flags| {
        cdl_sink.borrow_mut().push((offset, kind, flags))
    })));

    let mut audio = audio_buffer();
    let mut samples = 20;
    gb.run_for(&mut audio, &mut samples);

    assert_eq!(traced.borrow()[..3], [0x0100, 0x0101, 0x0150]);
    assert_eq!(
        logged.borrow()[..3],
        [
            (0x0100, CdlAddrKind::Rom, CdlFlags::EXEC_OPCODE),
            (0x0101, CdlAddrKind::Rom, CdlFlags::EXEC_OPCODE),
            (0x0102, CdlAddrKind::Rom, CdlFlags::EXEC_OPERAND),
        ]
    );
}

#[test]
fn external_access_hooks_are_opt_in() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    gb.set_read_callback(Some(Box::new(move |_, _| counter.set(counter.get() + 1))));

    gb.external_read(0xC000);
    assert_eq!(count.get(), 0);

    gb.set_external_access_hooks(true);
    gb.external_read(0xC000);
    assert_eq!(count.get(), 1);
}

#[test]
fn scanline_hook_walks_every_line_in_order() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = lines.clone();
    gb.set_scanline_callback(
        Some(Box::new(move |ly, _| sink.borrow_mut().push(ly))),
        ScanlineTrigger::EveryLine,
    );

    run_frame(&mut gb);
    run_frame(&mut gb);

    let lines = lines.borrow();
    assert!(lines.len() >= 154);
    let expected: Vec<u8> = (0..154).collect();
    assert_eq!(lines[..154], expected[..]);
}

#[test]
fn scanline_hook_can_rewrite_registers() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    let seen = Rc::new(Cell::new(0));
    let counter = seen.clone();
    gb.set_scanline_callback(
        Some(Box::new(move |_, regs| {
            counter.set(counter.get() + 1);
            regs.scx = 0x12;
        })),
        ScanlineTrigger::Line(10),
    );

    run_frame(&mut gb);
    run_frame(&mut gb);

    assert!(seen.get() >= 1);
    assert_eq!(gb.external_read(0xFF43), 0x12);
}

#[test]
fn scanline_hook_is_silent_while_lcd_is_off() {
    // LD A,0; LDH (0x40),A; JR -2
    let rom = with_program(rom_image(0x00, 2, 0), &[0x3E, 0x00, 0xE0, 0x40, 0x18, 0xFE]);
    let mut gb = loaded(&rom);

    let mut audio = audio_buffer();
    let mut samples = 100;
    gb.run_for(&mut audio, &mut samples);
    assert_eq!(gb.external_read(0xFF40) & 0x80, 0);

    let lines = Rc::new(Cell::new(0));
    let counter = lines.clone();
    gb.set_scanline_callback(
        Some(Box::new(move |_, _| counter.set(counter.get() + 1))),
        ScanlineTrigger::EveryLine,
    );

    let (a, _) = run_frame(&mut gb);
    let (b, _) = run_frame(&mut gb);
    assert_eq!(lines.get(), 0);
    // Blank frames keep coming at the normal rate.
    assert!(a >= 0 || b >= 0);
}

#[test]
fn blit_is_repeatable_and_honours_pitch() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    run_frame(&mut gb);

    let first = frame(&gb);
    assert_eq!(first, frame(&gb));

    let pitch = SCREEN_WIDTH + 40;
    let mut wide = vec![0x0102_0304; pitch * SCREEN_HEIGHT];
    gb.blit_to(Some(&mut wide), pitch);
    for y in 0..SCREEN_HEIGHT {
        assert_eq!(
            wide[y * pitch..y * pitch + SCREEN_WIDTH],
            first[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
        );
        assert_eq!(wide[y * pitch + SCREEN_WIDTH], 0x0102_0304);
    }

    gb.blit_to(None, SCREEN_WIDTH);
}

fn overlapping_sprites_pixel(first_tile: u8, second_tile: u8) -> u32 {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    {
        let vram = gb.memory_area(MemoryArea::Vram).expect("vram");
        // Tile 1 is solid colour 1, tile 2 solid colour 3.
        for row in 0..8 {
            vram[0x10 + row * 2] = 0xFF;
            vram[0x20 + row * 2] = 0xFF;
            vram[0x20 + row * 2 + 1] = 0xFF;
        }
    }
    {
        let oam = gb.memory_area(MemoryArea::Oam).expect("oam");
        oam[..8].copy_from_slice(&[16, 8, first_tile, 0, 16, 8, second_tile, 0]);
    }
    gb.external_write(0xFF48, 0xE4);
    gb.external_write(0xFF40, 0x93);
    let (at, _) = run_frame(&mut gb);
    assert!(at >= 0);
    frame(&gb)[0]
}

#[test]
fn dmg_sprites_at_the_same_x_draw_in_oam_order() {
    assert_eq!(overlapping_sprites_pixel(2, 1), 0x0000_0000);
    assert_eq!(overlapping_sprites_pixel(1, 2), 0x00AA_AAAA);
}

#[test]
fn blank_screen_uses_background_colour_zero() {
    let mut gb = GameBoy::new();
    gb.set_dmg_palette_color(DmgPalette::Background, 0, 0x0012_3456);
    gb.load(&rom_image(0x00, 2, 0), LoadFlags::empty())
        .expect("load");
    assert!(frame(&gb).iter().all(|&px| px == 0x0012_3456));
}

#[test]
fn registers_round_trip_with_f_masked() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    gb.set_regs(&[0x1234, 0xC100, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xFF, 0xBC, 0xDE]);
    assert_eq!(
        gb.get_regs(),
        [0x1234, 0xC100, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xF0, 0xBC, 0xDE]
    );
}

#[test]
fn memory_areas_need_a_cartridge() {
    let mut gb = GameBoy::new();
    assert!(gb.memory_area(MemoryArea::Vram).is_none());
    assert!(MemoryArea::from_index(6).is_none());
    assert_eq!(MemoryArea::from_index(5), Some(MemoryArea::Hram));

    gb.load(&rom_image(0x00, 2, 0), LoadFlags::empty())
        .expect("load");
    let len = |gb: &mut GameBoy, area| gb.memory_area(area).map(|m| m.len());
    assert_eq!(len(&mut gb, MemoryArea::Vram), Some(0x2000));
    assert_eq!(len(&mut gb, MemoryArea::Rom), Some(0x8000));
    assert_eq!(len(&mut gb, MemoryArea::Wram), Some(0x2000));
    assert_eq!(len(&mut gb, MemoryArea::Oam), Some(0xA0));
    assert_eq!(len(&mut gb, MemoryArea::Hram), Some(0x7F));
    assert_eq!(len(&mut gb, MemoryArea::CartRam), None);

    if let Some(wram) = gb.memory_area(MemoryArea::Wram) {
        wram[0] = 0x77;
    }
    assert_eq!(gb.external_read(0xC000), 0x77);
    assert_eq!(gb.external_read(0xE000), 0x77);
}

#[test]
fn mbc1_bank_numbers_alias_modulo_rom_size() {
    let mut gb = loaded(&rom_image(0x01, 4, 0));
    assert_eq!(gb.external_read(0x4000), 1);

    gb.external_write(0x2000, 0x02);
    assert_eq!(gb.external_read(0x4000), 2);

    // Bank 0 selects bank 1.
    gb.external_write(0x2000, 0x00);
    assert_eq!(gb.external_read(0x4000), 1);

    gb.external_write(0x2000, 0x06);
    assert_eq!(gb.external_read(0x4000), 2);
}

#[test]
fn mbc5_reaches_bank_zero_and_the_ninth_bit() {
    let mut gb = loaded(&rom_image(0x19, 4, 0));
    gb.external_write(0x2000, 0x00);
    assert_eq!(gb.external_read(0x4000), 0);

    gb.external_write(0x3000, 0x01);
    gb.external_write(0x2000, 0x03);
    assert_eq!(gb.external_read(0x4000), 3);
}

#[test]
fn disabled_cart_ram_floats_high() {
    let mut gb = loaded(&rom_image(0x03, 2, 0x02));
    assert_eq!(gb.external_read(0xA000), 0xFF);

    gb.external_write(0x0000, 0x0A);
    gb.external_write(0xA000, 0x42);
    assert_eq!(gb.external_read(0xA000), 0x42);

    gb.external_write(0x0000, 0x00);
    assert_eq!(gb.external_read(0xA000), 0xFF);
}

#[test]
fn multicart_detector_is_consulted_only_when_asked() {
    struct Recording(Rc<Cell<u32>>);
    impl MulticartDetector for Recording {
        fn is_multicart(&self, _rom: &[u8]) -> bool {
            self.0.set(self.0.get() + 1);
            false
        }
    }

    let calls = Rc::new(Cell::new(0));
    let mut gb = GameBoy::new();
    gb.set_multicart_detector(Box::new(Recording(calls.clone())));

    gb.load(&rom_image(0x01, 4, 0), LoadFlags::empty())
        .expect("load");
    assert_eq!(calls.get(), 0);

    gb.load(&rom_image(0x01, 4, 0), LoadFlags::MULTICART_COMPAT)
        .expect("load");
    assert_eq!(calls.get(), 1);

    gb.load(&rom_image(0x19, 4, 0), LoadFlags::MULTICART_COMPAT)
        .expect("load");
    assert_eq!(calls.get(), 1);
}

#[test]
fn savedata_length_and_rtc_footer() {
    let mut gb = GameBoy::new();
    assert_eq!(gb.save_savedata_length(false), 0);

    gb.load(&rom_image(0x10, 4, 0x03), LoadFlags::empty())
        .expect("load");
    assert_eq!(gb.save_savedata_length(true), 0x8000);
    assert_eq!(gb.save_savedata_length(false), 0x8000 + 48);
    assert_eq!(gb.save_savedata(true).len(), 0x8000);
    assert_eq!(gb.save_savedata(false).len(), 0x8000 + 48);

    // No battery, nothing to save.
    gb.load(&rom_image(0x02, 4, 0x03), LoadFlags::empty())
        .expect("load");
    assert_eq!(gb.save_savedata_length(false), 0);
    assert!(gb.save_savedata(false).is_empty());
}

#[test]
fn savedata_round_trips_into_a_fresh_machine() {
    let rom = rom_image(0x03, 4, 0x02);
    let mut gb = loaded(&rom);
    gb.external_write(0x0000, 0x0A);
    gb.external_write(0xA123, 0x42);

    let save = gb.save_savedata(true);
    assert_eq!(save, gb.save_savedata(true));

    let mut other = loaded(&rom);
    other.load_savedata(&save, true);
    other.external_write(0x0000, 0x0A);
    assert_eq!(other.external_read(0xA123), 0x42);
    assert_eq!(other.save_savedata(true), save);
}

#[test]
fn imported_savedata_replays_identically() {
    // Enable RAM, LD A,(0xA000), LD B,A, then spin.
    let rom = with_program(
        rom_image(0x03, 4, 0x02),
        &[0x3E, 0x0A, 0xEA, 0x00, 0x00, 0xFA, 0x00, 0xA0, 0x47, 0x18, 0xFE],
    );
    let mut source = loaded(&rom);
    source.external_write(0x0000, 0x0A);
    source.external_write(0xA000, 0x42);
    source.external_write(0xA1FF, 0x99);
    let save = source.save_savedata(true);

    let mut reset_after = loaded(&rom);
    run_frame(&mut reset_after);
    reset_after.load_savedata(&save, true);
    reset_after.reset();

    let mut fresh = loaded(&rom);
    fresh.load_savedata(&save, true);

    for _ in 0..3 {
        let mut audio_a = audio_buffer();
        let mut samples_a = SAMPLES_PER_FRAME;
        let at_a = reset_after.run_for(&mut audio_a, &mut samples_a);

        let mut audio_b = audio_buffer();
        let mut samples_b = SAMPLES_PER_FRAME;
        let at_b = fresh.run_for(&mut audio_b, &mut samples_b);

        assert_eq!(at_a, at_b);
        assert_eq!(samples_a, samples_b);
        assert_eq!(audio_a, audio_b);
        assert_eq!(reset_after.get_regs(), fresh.get_regs());
        assert_eq!(frame(&reset_after), frame(&fresh));
    }
    assert_eq!(fresh.get_regs()[3], 0x42);
    assert_eq!(reset_after.save_savedata(true), fresh.save_savedata(true));
}

#[test]
fn deterministic_savedata_leaves_the_clock_alone() {
    let mut gb = GameBoy::new();
    gb.set_time_mode(TimeMode::Cycles);
    gb.load(&rom_image(0x10, 4, 0x03), LoadFlags::empty())
        .expect("load");

    assert!(gb.set_rtc_regs(&[0, 3, 4, 5, 6, 0, 0, 3, 4, 5, 6]));
    let with_clock = gb.save_savedata(false);

    let current = [1, 7, 8, 9, 10, 0, 1, 7, 8, 9, 10];
    assert!(gb.set_rtc_regs(&current));
    gb.load_savedata(&with_clock, true);
    assert_eq!(gb.get_rtc_regs(), Some(current));

    gb.load_savedata(&with_clock, false);
    assert_eq!(gb.get_rtc_regs(), Some([0, 3, 4, 5, 6, 0, 0, 3, 4, 5, 6]));
}

#[test]
fn rtc_reads_return_the_latched_copy() {
    let mut gb = GameBoy::new();
    gb.set_time_mode(TimeMode::Cycles);
    gb.load(&rom_image(0x10, 4, 0x03), LoadFlags::empty())
        .expect("load");

    assert!(gb.set_rtc_regs(&[0, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0]));
    gb.external_write(0x0000, 0x0A);
    gb.external_write(0x4000, 0x08);
    assert_eq!(gb.external_read(0xA000), 0xC0);

    gb.external_write(0x6000, 0x00);
    gb.external_write(0x6000, 0x01);
    assert_eq!(gb.external_read(0xA000), 0xC5);

    let regs = gb.get_rtc_regs().expect("rtc");
    assert_eq!(regs[4], 5);
    assert_eq!(regs[10], 5);

    // A register write lands in the live clock only.
    gb.external_write(0xA000, 0x2A);
    assert_eq!(gb.external_read(0xA000), 0xC5);
    let regs = gb.get_rtc_regs().expect("rtc");
    assert_eq!(regs[4], 0x2A);
    assert_eq!(regs[10], 5);

    gb.external_write(0x6000, 0x00);
    gb.external_write(0x6000, 0x01);
    assert_eq!(gb.external_read(0xA000), 0xEA);

    let mut plain = loaded(&rom_image(0x00, 2, 0));
    assert_eq!(plain.get_rtc_regs(), None);
    assert!(!plain.set_rtc_regs(&[0; 11]));
}

#[test]
fn state_round_trip_replays_identically() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    run_frame(&mut gb);
    let state = gb.save_state().expect("save");

    let mut audio_a = audio_buffer();
    let mut samples_a = SAMPLES_PER_FRAME;
    let at_a = gb.run_for(&mut audio_a, &mut samples_a);
    let regs_a = gb.get_regs();
    let frame_a = frame(&gb);

    gb.load_state(&state).expect("load");

    let mut audio_b = audio_buffer();
    let mut samples_b = SAMPLES_PER_FRAME;
    let at_b = gb.run_for(&mut audio_b, &mut samples_b);

    assert_eq!(at_a, at_b);
    assert_eq!(samples_a, samples_b);
    assert_eq!(audio_a, audio_b);
    assert_eq!(regs_a, gb.get_regs());
    assert_eq!(frame_a, frame(&gb));
}

#[test]
fn failed_restore_leaves_machine_untouched() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    run_frame(&mut gb);
    let state = gb.save_state().expect("save");
    run_frame(&mut gb);
    let before = gb.save_state().expect("save");

    assert_eq!(gb.load_state(b"nope"), Err(StateError::BadHeader));
    assert_eq!(
        gb.load_state(&state[..state.len() - 1]),
        Err(StateError::Truncated)
    );
    let mut padded = state.clone();
    padded.push(0);
    assert_eq!(gb.load_state(&padded), Err(StateError::TrailingData(1)));

    assert_eq!(gb.save_state().expect("save"), before);
}

#[test]
fn state_needs_a_cartridge() {
    let mut gb = GameBoy::new();
    assert_eq!(gb.save_state(), Err(StateError::NoCartridge));
    assert_eq!(gb.load_state(&[]), Err(StateError::NoCartridge));
}

#[test]
fn state_from_a_different_cartridge_is_rejected() {
    let mut with_ram = loaded(&rom_image(0x03, 4, 0x02));
    let state = with_ram.save_state().expect("save");

    let mut gb = loaded(&rom_image(0x00, 2, 0));
    assert_eq!(gb.load_state(&state), Err(StateError::LayoutMismatch));
}

#[test]
fn div_resets_on_write() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    assert_eq!(gb.external_read(0xFF04), 0xAB);
    gb.external_write(0xFF04, 0x55);
    assert_eq!(gb.external_read(0xFF04), 0x00);
}

#[test]
fn link_status_plays_the_partner() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    gb.external_write(0xFF0F, 0x00);
    gb.external_write(0xFF01, 0x5A);
    gb.external_write(0xFF02, 0x81);
    assert_eq!(gb.link_status(259), 1);

    assert_eq!(gb.link_status(0x3C), 0);
    assert_eq!(gb.external_read(0xFF01), 0x3C);
    assert_eq!(gb.external_read(0xFF0F) & 0x08, 0x08);
    assert_eq!(gb.link_status(259), 0);
    assert_eq!(gb.link_status(256), 1);
    assert_eq!(gb.link_status(258), 0x5A);
    assert_eq!(gb.link_status(257), 0);
    assert_eq!(gb.link_status(256), 0);
    assert_eq!(gb.link_status(300), -1);
}

#[test]
fn partner_byte_is_ignored_while_idle() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    gb.external_write(0xFF01, 0x11);
    gb.external_write(0xFF02, 0x7E);
    gb.external_write(0xFF0F, 0x00);

    assert_eq!(gb.link_status(0x42), 0);
    assert_eq!(gb.external_read(0xFF01), 0x11);
    assert_eq!(gb.external_read(0xFF0F) & 0x08, 0);
    assert_eq!(gb.link_status(256), 0);
}

#[test]
fn internal_transfer_completes_and_calls_link_hook() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    gb.set_link_callback(Some(Box::new(move || counter.set(counter.get() + 1))));

    gb.external_write(0xFF01, 0x5A);
    gb.external_write(0xFF02, 0x81);

    let mut audio = audio_buffer();
    let mut samples = 4_096;
    gb.run_for(&mut audio, &mut samples);

    assert_eq!(fired.get(), 1);
    assert_eq!(gb.external_read(0xFF01), 0xFF);
    assert_eq!(gb.link_status(258), 0x5A);
}

#[test]
fn pressing_a_selected_button_requests_joypad_interrupt() {
    let mut gb = loaded(&rom_image(0x00, 2, 0));
    let held = Rc::new(Cell::new(Buttons::empty()));
    let input = held.clone();
    gb.set_input_getter(Some(Box::new(move || input.get())));

    // Select the action buttons.
    gb.external_write(0xFF00, 0x10);
    gb.external_write(0xFF0F, 0x00);
    assert_eq!(gb.external_read(0xFF00), 0xDF);

    held.set(Buttons::A);
    assert_eq!(gb.external_read(0xFF00), 0xDE);
    assert_eq!(gb.external_read(0xFF0F) & 0x10, 0x10);

    // Still held: no new edge.
    gb.external_write(0xFF0F, 0x00);
    gb.external_read(0xFF00);
    assert_eq!(gb.external_read(0xFF0F) & 0x10, 0);

    // Directions are not selected.
    held.set(Buttons::A | Buttons::DOWN);
    assert_eq!(gb.external_read(0xFF00), 0xDE);
    assert_eq!(gb.external_read(0xFF0F) & 0x10, 0);
}
