//! Core Local Interruptor (CLINT).
//!
//! Memory-mapped control and status registers for software and timer
//! interrupts, laid out for a single RV32 hart: the 64-bit time and compare
//! values are exposed as low/high 32-bit word pairs.
//!
//! # Memory Map
//!
//! * `0x0000`: MSIP (machine software interrupt pending, bit 0)
//! * `0x4000`: MTIMECMP low word
//! * `0x4004`: MTIMECMP high word
//! * `0xBFF8`: MTIME low word
//! * `0xBFFC`: MTIME high word

use crate::common::BusFault;
use crate::soc::traits::BusTarget;

/// Offset of the machine software interrupt pending register.
const MSIP_OFFSET: u32 = 0x0000;
/// Offset of the machine time compare register (low word).
const MTIMECMP_OFFSET: u32 = 0x4000;
/// Offset of the machine time register (low word).
const MTIME_OFFSET: u32 = 0xBFF8;

/// CLINT device state.
#[derive(Debug)]
pub struct Clint {
    msip: u32,
    mtime_lo: u32,
    mtime_hi: u32,
    mtimecmp_lo: u32,
    mtimecmp_hi: u32,
}

impl Default for Clint {
    fn default() -> Self {
        Self::new()
    }
}

impl Clint {
    /// Creates a new CLINT with time at zero and the comparator at
    /// `u64::MAX`, so no timer interrupt fires before firmware programs it.
    pub fn new() -> Self {
        Self {
            msip: 0,
            mtime_lo: 0,
            mtime_hi: 0,
            mtimecmp_lo: u32::MAX,
            mtimecmp_hi: u32::MAX,
        }
    }

    /// Returns the 64-bit machine time value.
    pub fn mtime(&self) -> u64 {
        (u64::from(self.mtime_hi) << 32) | u64::from(self.mtime_lo)
    }

    /// Returns the 64-bit machine time comparator.
    pub fn mtimecmp(&self) -> u64 {
        (u64::from(self.mtimecmp_hi) << 32) | u64::from(self.mtimecmp_lo)
    }

    /// Advances the time register by one tick.
    ///
    /// The low word is incremented; exactly when the post-increment value is
    /// zero, the high word is incremented by one. This is the single-step
    /// carry of the real-time counter, not a full 64-bit add.
    pub fn bump_mtime(&mut self) {
        self.mtime_lo = self.mtime_lo.wrapping_add(1);
        if self.mtime_lo == 0 {
            self.mtime_hi = self.mtime_hi.wrapping_add(1);
        }
    }

    /// Returns whether a software interrupt is pending for the given hart.
    ///
    /// Only hart 0 exists on this machine.
    pub fn software_pending(&self, hart: u32) -> bool {
        hart == 0 && (self.msip & 1) != 0
    }

    /// Returns whether a timer interrupt is pending for the given hart.
    pub fn timer_pending(&self, hart: u32) -> bool {
        hart == 0 && self.mtime() >= self.mtimecmp()
    }

    fn read_word(&self, offset: u32) -> u32 {
        match offset {
            MSIP_OFFSET => self.msip,
            MTIMECMP_OFFSET => self.mtimecmp_lo,
            o if o == MTIMECMP_OFFSET + 4 => self.mtimecmp_hi,
            MTIME_OFFSET => self.mtime_lo,
            o if o == MTIME_OFFSET + 4 => self.mtime_hi,
            _ => 0,
        }
    }

    fn write_word(&mut self, offset: u32, val: u32) {
        match offset {
            MSIP_OFFSET => self.msip = val & 1,
            MTIMECMP_OFFSET => self.mtimecmp_lo = val,
            o if o == MTIMECMP_OFFSET + 4 => self.mtimecmp_hi = val,
            MTIME_OFFSET => self.mtime_lo = val,
            o if o == MTIME_OFFSET + 4 => self.mtime_hi = val,
            _ => {}
        }
    }
}

impl BusTarget for Clint {
    /// Reads up to eight bytes; the value is extracted from the addressed
    /// word pair, so narrow and misaligned reads see the same bytes a word
    /// read would.
    fn load(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), BusFault> {
        if buf.len() > 8 {
            return Err(BusFault);
        }
        let aligned = offset & !3;
        let lo = u64::from(self.read_word(aligned));
        let hi = u64::from(self.read_word(aligned + 4));
        let val = ((hi << 32) | lo) >> ((offset & 3) * 8);
        buf.copy_from_slice(&val.to_le_bytes()[..buf.len()]);
        Ok(())
    }

    /// Writes a register. Registers have word granularity: only aligned
    /// 32-bit (or 64-bit pair) stores take effect; narrower stores are
    /// accepted and ignored.
    fn store(&mut self, offset: u32, buf: &[u8]) -> Result<(), BusFault> {
        match buf.len() {
            4 if offset & 3 == 0 => {
                let val = u32::from_le_bytes(buf.try_into().map_err(|_| BusFault)?);
                self.write_word(offset, val);
            }
            8 if offset & 7 == 0 => {
                let val = u64::from_le_bytes(buf.try_into().map_err(|_| BusFault)?);
                self.write_word(offset, val as u32);
                self.write_word(offset + 4, (val >> 32) as u32);
            }
            1 | 2 => {}
            _ => return Err(BusFault),
        }
        Ok(())
    }
}
