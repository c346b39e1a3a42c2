use super::state::{StateSync, SyncState};

const ANY_BANK_TAG: u32 = 0xFFFF;

/// Which ROM bank a breakpoint applies to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BankSelector {
    Any,
    Bank(u16),
}

/// An execution breakpoint checked before every opcode fetch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Breakpoint {
    pub bank: BankSelector,
    pub addr: u16,
}

impl Breakpoint {
    pub fn new(bank: BankSelector, addr: u16) -> Self {
        Self { bank, addr }
    }

    pub fn any_bank(addr: u16) -> Self {
        Self::new(BankSelector::Any, addr)
    }

    /// Decode the packed `0xBBBBAAAA` form used by front-ends: the high
    /// half is the bank, the low half the address. Bank 0 means any bank.
    pub fn from_packed(packed: u32) -> Self {
        let addr = packed as u16;
        let bank = (packed >> 16) as u16;
        if bank == 0 {
            Self::any_bank(addr)
        } else {
            Self::new(BankSelector::Bank(bank), addr)
        }
    }

    pub fn to_packed(self) -> u32 {
        let bank = match self.bank {
            BankSelector::Any => 0,
            BankSelector::Bank(bank) => u32::from(bank),
        };
        (bank << 16) | u32::from(self.addr)
    }

    fn matches(self, bank: u16, pc: u16) -> bool {
        self.addr == pc
            && match self.bank {
                BankSelector::Any => true,
                BankSelector::Bank(b) => b == bank,
            }
    }
}

/// Breakpoint set plus the bookkeeping `run_for` needs to stop on a hit
/// and resume past it.
#[derive(Clone, Debug, Default)]
pub(crate) struct Debugger {
    breakpoints: Vec<Breakpoint>,
    hit: Option<u16>,
    /// PC of the last hit. The next fetch at this address is let through
    /// once so that resuming does not re-trigger immediately.
    resume_pc: Option<u16>,
}

impl Debugger {
    pub(crate) fn set_breakpoints(&mut self, breakpoints: &[Breakpoint]) {
        self.breakpoints = breakpoints.to_vec();
        self.resume_pc = None;
    }

    pub(crate) fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub(crate) fn hit(&self) -> Option<u16> {
        self.hit
    }

    pub(crate) fn clear_hit(&mut self) {
        self.hit = None;
    }

    pub(crate) fn reset(&mut self) {
        self.hit = None;
        self.resume_pc = None;
    }

    /// Returns `true` when execution must stop before fetching at `pc`.
    pub(crate) fn check(&mut self, bank: u16, pc: u16) -> bool {
        if self.resume_pc.take() == Some(pc) {
            return false;
        }
        if self.breakpoints.is_empty() {
            return false;
        }
        if self.breakpoints.iter().any(|bp| bp.matches(bank, pc)) {
            log::debug!("breakpoint hit at {bank:02X}:{pc:04X}");
            self.hit = Some(pc);
            self.resume_pc = Some(pc);
            return true;
        }
        false
    }
}

impl SyncState for Debugger {
    fn sync_state(&mut self, s: &mut StateSync<'_>) {
        // Any-bank entries are stored with an out-of-range bank so that an
        // explicit bank 0 survives the round trip.
        let mut packed: Vec<u32> = self
            .breakpoints
            .iter()
            .map(|bp| {
                let bank = match bp.bank {
                    BankSelector::Any => ANY_BANK_TAG,
                    BankSelector::Bank(bank) => u32::from(bank),
                };
                (bank << 16) | u32::from(bp.addr)
            })
            .collect();
        s.sync_u32_vec(&mut packed);
        if s.is_restoring() {
            self.breakpoints = packed
                .into_iter()
                .map(|word| {
                    let bank = word >> 16;
                    let addr = word as u16;
                    if bank == ANY_BANK_TAG {
                        Breakpoint::any_bank(addr)
                    } else {
                        Breakpoint::new(BankSelector::Bank(bank as u16), addr)
                    }
                })
                .collect();
        }
        s.sync_option_u16(&mut self.hit);
        s.sync_option_u16(&mut self.resume_pc);
    }
}
