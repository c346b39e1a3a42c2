use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use lockstep_gb::{GameBoy, LoadFlags, SAMPLES_PER_FRAME, SCREEN_HEIGHT, SCREEN_WIDTH};

const USAGE: &str = "Usage: lockstep_dump <rom_path> <out_rgb24_path> [frames]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(rom_path), Some(out_path)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let rom_path = PathBuf::from(rom_path);
    let out_path = PathBuf::from(out_path);
    let frames: u32 = match args.next() {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid frame count '{arg}'"))?,
        None => 120,
    };

    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM '{}'", rom_path.display()))?;

    let mut gb = GameBoy::new();
    gb.load(&rom, LoadFlags::empty())
        .with_context(|| format!("failed to load '{}'", rom_path.display()))?;

    // Room for one frame plus the worst-case overshoot.
    let mut audio = vec![0u32; SAMPLES_PER_FRAME + lockstep_gb::MAX_OVERSHOOT_SAMPLES];
    let mut completed = 0u32;
    let mut total_samples = 0usize;
    while completed < frames {
        let mut samples = SAMPLES_PER_FRAME;
        if gb.run_for(&mut audio, &mut samples) >= 0 {
            completed += 1;
        }
        total_samples += samples;
    }

    let mut pixels = vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT];
    gb.blit_to(Some(&mut pixels), SCREEN_WIDTH);
    let rgb: Vec<u8> = pixels
        .iter()
        .flat_map(|&px| [(px >> 16) as u8, (px >> 8) as u8, px as u8])
        .collect();

    std::fs::write(&out_path, &rgb)
        .with_context(|| format!("failed to write '{}'", out_path.display()))?;

    println!(
        "Wrote {} bytes ({}x{} rgb24) after {} frames ({} samples) to '{}'",
        rgb.len(),
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        frames,
        total_samples,
        out_path.display()
    );
    Ok(())
}
