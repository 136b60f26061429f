//! Platform-Level Interrupt Controller (PLIC).
//!
//! Arbitrates global external interrupts and distributes them to hart
//! contexts. This machine has 32 sources and two contexts; source 0 is
//! reserved and never claimable.
//!
//! # Memory Map
//!
//! * `0x00_0000 + 4*id`: source priority
//! * `0x00_1000`: pending bits (one word)
//! * `0x00_2000 + 0x80*ctx`: per-context enable bits (one word)
//! * `0x20_0000 + 0x1000*ctx`: priority threshold (+0), claim/complete (+4)

use crate::common::BusFault;
use crate::soc::traits::BusTarget;

/// Number of interrupt sources (including the reserved source 0).
const NUM_SOURCES: u32 = 32;
/// Number of hart contexts.
const NUM_CONTEXTS: usize = 2;

/// Base offset of the per-source priority registers.
const PRIORITY_BASE: u32 = 0x0000;
/// Offset of the pending-bits word.
const PENDING_OFFSET: u32 = 0x1000;
/// Base offset of the per-context enable words.
const ENABLE_BASE: u32 = 0x2000;
/// Stride between per-context enable blocks.
const ENABLE_STRIDE: u32 = 0x80;
/// Base offset of the per-context threshold/claim registers.
const CONTEXT_BASE: u32 = 0x20_0000;
/// Stride between per-context register blocks.
const CONTEXT_STRIDE: u32 = 0x1000;

/// PLIC device state.
#[derive(Debug)]
pub struct Plic {
    priorities: [u32; NUM_SOURCES as usize],
    pending: u32,
    enables: [u32; NUM_CONTEXTS],
    thresholds: [u32; NUM_CONTEXTS],
}

impl Default for Plic {
    fn default() -> Self {
        Self::new()
    }
}

impl Plic {
    /// Creates a new PLIC with all priorities zero and nothing pending.
    pub fn new() -> Self {
        Self {
            priorities: [0; NUM_SOURCES as usize],
            pending: 0,
            enables: [0; NUM_CONTEXTS],
            thresholds: [0; NUM_CONTEXTS],
        }
    }

    /// Latches the given source as pending.
    ///
    /// Source 0 and out-of-range ids are ignored. Level-triggered devices
    /// re-raise their source every cycle while the condition holds.
    pub fn raise(&mut self, source: u32) {
        if source > 0 && source < NUM_SOURCES {
            self.pending |= 1 << source;
        }
    }

    /// Returns whether an external interrupt is pending for the context:
    /// some source is pending, enabled, and above the context threshold.
    pub fn external_pending(&self, ctx: usize) -> bool {
        self.best_source(ctx) != 0
    }

    /// Claims the highest-priority qualified source for the context,
    /// clearing its pending bit. Returns 0 when nothing qualifies.
    pub fn claim(&mut self, ctx: usize) -> u32 {
        let id = self.best_source(ctx);
        if id != 0 {
            self.pending &= !(1 << id);
        }
        id
    }

    /// Returns the id of the highest-priority pending+enabled source above
    /// the context threshold, or 0.
    fn best_source(&self, ctx: usize) -> u32 {
        let Some(&enable) = self.enables.get(ctx) else {
            return 0;
        };
        let threshold = self.thresholds[ctx];
        let active = self.pending & enable;

        let mut best_id = 0;
        let mut best_prio = threshold;
        for id in 1..NUM_SOURCES {
            if active & (1 << id) != 0 && self.priorities[id as usize] > best_prio {
                best_prio = self.priorities[id as usize];
                best_id = id;
            }
        }
        best_id
    }

    fn read_word(&mut self, offset: u32) -> u32 {
        if offset < PENDING_OFFSET {
            let idx = ((offset - PRIORITY_BASE) / 4) as usize;
            return self.priorities.get(idx).copied().unwrap_or(0);
        }
        if offset == PENDING_OFFSET {
            return self.pending;
        }
        if (ENABLE_BASE..CONTEXT_BASE).contains(&offset) {
            let ctx = ((offset - ENABLE_BASE) / ENABLE_STRIDE) as usize;
            if (offset - ENABLE_BASE) % ENABLE_STRIDE == 0 {
                return self.enables.get(ctx).copied().unwrap_or(0);
            }
            return 0;
        }
        if offset >= CONTEXT_BASE {
            let ctx = ((offset - CONTEXT_BASE) / CONTEXT_STRIDE) as usize;
            if ctx < NUM_CONTEXTS {
                match offset & (CONTEXT_STRIDE - 1) {
                    0 => return self.thresholds[ctx],
                    4 => return self.claim(ctx),
                    _ => {}
                }
            }
        }
        0
    }

    fn write_word(&mut self, offset: u32, val: u32) {
        if offset < PENDING_OFFSET {
            let idx = ((offset - PRIORITY_BASE) / 4) as usize;
            if let Some(prio) = self.priorities.get_mut(idx) {
                *prio = val;
            }
            return;
        }
        if (ENABLE_BASE..CONTEXT_BASE).contains(&offset) {
            let ctx = ((offset - ENABLE_BASE) / ENABLE_STRIDE) as usize;
            if (offset - ENABLE_BASE) % ENABLE_STRIDE == 0 {
                if let Some(enable) = self.enables.get_mut(ctx) {
                    *enable = val;
                }
            }
            return;
        }
        if offset >= CONTEXT_BASE {
            let ctx = ((offset - CONTEXT_BASE) / CONTEXT_STRIDE) as usize;
            if ctx < NUM_CONTEXTS {
                match offset & (CONTEXT_STRIDE - 1) {
                    0 => self.thresholds[ctx] = val,
                    // Complete: accepted and ignored; level sources re-raise.
                    4 => {}
                    _ => {}
                }
            }
        }
    }
}

impl BusTarget for Plic {
    /// Reads the addressed word; narrow reads extract bytes from it. Reads
    /// of the claim register have their architectural side effect.
    fn load(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), BusFault> {
        if buf.len() > 4 {
            return Err(BusFault);
        }
        let word = self.read_word(offset & !3);
        let val = word >> ((offset & 3) * 8);
        buf.copy_from_slice(&val.to_le_bytes()[..buf.len()]);
        Ok(())
    }

    /// Writes the addressed word. Registers have word granularity; narrower
    /// stores are accepted and ignored.
    fn store(&mut self, offset: u32, buf: &[u8]) -> Result<(), BusFault> {
        match buf.len() {
            4 if offset & 3 == 0 => {
                let val = u32::from_le_bytes(buf.try_into().map_err(|_| BusFault)?);
                self.write_word(offset, val);
            }
            1 | 2 => {}
            _ => return Err(BusFault),
        }
        Ok(())
    }
}
