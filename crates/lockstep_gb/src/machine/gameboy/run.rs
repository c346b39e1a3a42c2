use super::GameBoy;

impl GameBoy {
    /// Run until a video frame completes or at least `*samples` stereo
    /// samples have been produced, whichever happens first.
    ///
    /// Each sample packs left in the low half-word and right in the high
    /// half-word; one sample is produced every two real-time cycles. Both
    /// conditions are checked between instructions, so the machine may
    /// overshoot by up to [`MAX_OVERSHOOT_SAMPLES`](crate::MAX_OVERSHOOT_SAMPLES).
    /// A frame that completes on the last produced sample keeps the run
    /// going for one more instruction, so a returned offset always lies
    /// inside the produced range.
    ///
    /// On return `*samples` holds the number produced. As many as fit are
    /// copied into `audio`. A breakpoint hit stops the call early.
    ///
    /// Returns the sample offset at which the frame completed, or -1 when
    /// the call ended without one. Without a cartridge nothing runs,
    /// `audio` is silenced and -1 is returned.
    pub fn run_for(&mut self, audio: &mut [u32], samples: &mut usize) -> isize {
        let requested = *samples;
        self.bus.apu.samples.clear();
        self.bus.frame_sample = None;
        self.bus.run_cycles = 0;
        self.bus.debugger.clear_hit();

        if !self.is_loaded() {
            let n = requested.min(audio.len());
            audio[..n].fill(0);
            *samples = 0;
            return -1;
        }

        loop {
            let produced = self.bus.apu.samples.len();
            match self.bus.frame_sample {
                Some(at) if at < produced => break,
                Some(_) => {}
                None if produced >= requested => break,
                None => {}
            }
            if self.cpu.step(&mut self.bus) == 0 {
                break;
            }
        }

        let produced = self.bus.apu.samples.len();
        let n = produced.min(audio.len());
        audio[..n].copy_from_slice(&self.bus.apu.samples[..n]);
        *samples = produced;

        match self.bus.frame_sample {
            Some(at) if at < produced => at as isize,
            _ => -1,
        }
    }

    /// Copy the last completed frame into `dest` as 0xRRGGBB words.
    ///
    /// `pitch` is the distance between rows in pixels; values below the
    /// screen width are treated as the screen width. Rows that do not fit
    /// in `dest` are skipped. `None` does nothing.
    pub fn blit_to(&self, dest: Option<&mut [u32]>, pitch: usize) {
        if let Some(dest) = dest {
            self.bus.ppu.blit_to(dest, pitch);
        }
    }
}
