use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_ld_rp_d16<B: Bus>(&mut self, bus: &mut B, rp: u8) -> u32 {
        let value = self.fetch16(bus);
        self.write_rp(rp, value);
        12
    }

    pub(super) fn exec_ld_r_d8<B: Bus>(&mut self, bus: &mut B, reg: u8) -> u32 {
        let value = self.fetch8(bus);
        self.write_reg8(bus, reg, value);
        if reg == 6 {
            12
        } else {
            8
        }
    }

    /// LD r, r' for every pair except (HL),(HL), which is HALT.
    pub(super) fn exec_ld_r_r<B: Bus>(&mut self, bus: &mut B, dst: u8, src: u8) -> u32 {
        let value = self.read_reg8(bus, src);
        self.write_reg8(bus, dst, value);
        if dst == 6 || src == 6 {
            8
        } else {
            4
        }
    }

    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        let [hi, lo] = self.regs.sp.to_be_bytes();
        bus.write8(addr, lo);
        bus.write8(addr.wrapping_add(1), hi);
        20
    }

    pub(super) fn exec_ldh_a8<B: Bus>(&mut self, bus: &mut B, load: bool) -> u32 {
        let addr = 0xFF00 | self.fetch8(bus) as u16;
        self.transfer_a(bus, addr, load);
        12
    }

    pub(super) fn exec_ldh_c<B: Bus>(&mut self, bus: &mut B, load: bool) -> u32 {
        let addr = 0xFF00 | self.regs.c as u16;
        self.transfer_a(bus, addr, load);
        8
    }

    pub(super) fn exec_ld_a16_a<B: Bus>(&mut self, bus: &mut B, load: bool) -> u32 {
        let addr = self.fetch16(bus);
        self.transfer_a(bus, addr, load);
        16
    }

    /// LD (BC),A / LD (DE),A / LD (HL+),A / LD (HL-),A
    pub(super) fn exec_store_a_indirect<B: Bus>(&mut self, bus: &mut B, p: u8) -> u32 {
        let addr = self.indirect_address(p);
        bus.write8(addr, self.regs.a);
        8
    }

    /// LD A,(BC) / LD A,(DE) / LD A,(HL+) / LD A,(HL-)
    pub(super) fn exec_load_a_indirect<B: Bus>(&mut self, bus: &mut B, p: u8) -> u32 {
        let addr = self.indirect_address(p);
        self.regs.a = bus.read8(addr);
        8
    }

    /// Resolve the pointer for the indirect accumulator loads, applying the
    /// HL post-increment/decrement.
    fn indirect_address(&mut self, p: u8) -> u16 {
        match p {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    #[inline]
    fn transfer_a<B: Bus>(&mut self, bus: &mut B, addr: u16, load: bool) {
        if load {
            self.regs.a = bus.read8(addr);
        } else {
            bus.write8(addr, self.regs.a);
        }
    }
}
