//! Bus router for the physical address space.
//!
//! This module routes every physical access to exactly one backing region.
//! It provides:
//! 1. **Region table:** A fixed, data-driven list of `(base, size, target)`
//!    windows built once at construction and checked for overlap.
//! 2. **Dispatch:** Byte-exact load/store with caller-chosen width; device
//!    results are propagated verbatim.
//! 3. **Typed access:** Accessors for the devices so the machine can update
//!    them and read their pending state after each step.

use crate::common::constants::{
    CLINT_BASE, CLINT_SIZE, PLIC_BASE, PLIC_SIZE, RAM_BASE, UART0_BASE, UART1_BASE, UART_SIZE,
};
use crate::common::BusFault;
use crate::soc::devices::{ByteChannel, Clint, Plic, Uart};
use crate::soc::memory::Ram;
use crate::soc::traits::BusTarget;

/// Which backing target a region routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegionKind {
    Ram,
    Plic,
    Clint,
    Uart0,
    Uart1,
}

/// One window of the physical address space.
#[derive(Debug, Clone, Copy)]
struct Region {
    base: u32,
    size: u32,
    kind: RegionKind,
}

impl Region {
    /// Returns the window-relative offset of `[addr, addr + len)` when the
    /// whole range lies inside this region.
    fn rebase(&self, addr: u32, len: usize) -> Option<u32> {
        let offset = addr.checked_sub(self.base)?;
        if u64::from(offset) + len as u64 <= u64::from(self.size) {
            Some(offset)
        } else {
            None
        }
    }
}

/// System bus: owns RAM and the devices and dispatches physical accesses.
#[derive(Debug)]
pub struct SystemBus {
    ram: Ram,
    plic: Plic,
    clint: Clint,
    uart0: Uart,
    uart1: Uart,
    regions: [Region; 5],
}

impl SystemBus {
    /// Creates the bus with the fixed memory map, RAM of the given size, and
    /// the two UART channel backends.
    ///
    /// # Panics
    ///
    /// Panics if the configured regions overlap; an overlapping map is a
    /// construction bug, never a runtime condition.
    pub fn new(ram_size: usize, uart0: Box<dyn ByteChannel>, uart1: Box<dyn ByteChannel>) -> Self {
        let regions = [
            Region {
                base: RAM_BASE,
                size: u32::try_from(ram_size).unwrap_or(u32::MAX),
                kind: RegionKind::Ram,
            },
            Region {
                base: PLIC_BASE,
                size: PLIC_SIZE,
                kind: RegionKind::Plic,
            },
            Region {
                base: CLINT_BASE,
                size: CLINT_SIZE,
                kind: RegionKind::Clint,
            },
            Region {
                base: UART0_BASE,
                size: UART_SIZE,
                kind: RegionKind::Uart0,
            },
            Region {
                base: UART1_BASE,
                size: UART_SIZE,
                kind: RegionKind::Uart1,
            },
        ];
        assert_disjoint(&regions);

        Self {
            ram: Ram::new(ram_size),
            plic: Plic::new(),
            clint: Clint::new(),
            uart0: Uart::new(uart0),
            uart1: Uart::new(uart1),
            regions,
        }
    }

    /// Reads `buf.len()` bytes at the physical address.
    ///
    /// # Errors
    ///
    /// Returns [`BusFault`] when `[addr, addr + len)` is not fully contained
    /// in any mapped region, or when the owning device rejects the access.
    pub fn load(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), BusFault> {
        let (kind, offset) = self.resolve(addr, buf.len())?;
        self.target(kind).load(offset, buf)
    }

    /// Writes `buf.len()` bytes at the physical address.
    ///
    /// # Errors
    ///
    /// Returns [`BusFault`] when `[addr, addr + len)` is not fully contained
    /// in any mapped region, or when the owning device rejects the access.
    pub fn store(&mut self, addr: u32, buf: &[u8]) -> Result<(), BusFault> {
        let (kind, offset) = self.resolve(addr, buf.len())?;
        self.target(kind).store(offset, buf)
    }

    /// Returns whether any region claims the given byte address.
    pub fn is_mapped(&self, addr: u32) -> bool {
        self.regions.iter().any(|r| r.rebase(addr, 1).is_some())
    }

    /// Returns the `(base, size)` windows of the address map, RAM first.
    pub fn windows(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.regions.iter().map(|r| (r.base, r.size))
    }

    /// Returns the RAM region.
    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    /// Returns the RAM region mutably.
    pub fn ram_mut(&mut self) -> &mut Ram {
        &mut self.ram
    }

    /// Returns the timer unit.
    pub fn clint(&self) -> &Clint {
        &self.clint
    }

    /// Returns the timer unit mutably.
    pub fn clint_mut(&mut self) -> &mut Clint {
        &mut self.clint
    }

    /// Returns the interrupt controller.
    pub fn plic(&self) -> &Plic {
        &self.plic
    }

    /// Returns the interrupt controller mutably.
    pub fn plic_mut(&mut self) -> &mut Plic {
        &mut self.plic
    }

    /// Returns the primary UART mutably.
    pub fn uart0_mut(&mut self) -> &mut Uart {
        &mut self.uart0
    }

    /// Returns the secondary UART mutably.
    pub fn uart1_mut(&mut self) -> &mut Uart {
        &mut self.uart1
    }

    /// Finds the single region containing the access range.
    fn resolve(&self, addr: u32, len: usize) -> Result<(RegionKind, u32), BusFault> {
        self.regions
            .iter()
            .find_map(|r| r.rebase(addr, len).map(|offset| (r.kind, offset)))
            .ok_or(BusFault)
    }

    fn target(&mut self, kind: RegionKind) -> &mut dyn BusTarget {
        match kind {
            RegionKind::Ram => &mut self.ram,
            RegionKind::Plic => &mut self.plic,
            RegionKind::Clint => &mut self.clint,
            RegionKind::Uart0 => &mut self.uart0,
            RegionKind::Uart1 => &mut self.uart1,
        }
    }
}

/// Panics if any two regions overlap.
fn assert_disjoint(regions: &[Region]) {
    for (i, a) in regions.iter().enumerate() {
        for b in &regions[i + 1..] {
            let a_end = u64::from(a.base) + u64::from(a.size);
            let b_end = u64::from(b.base) + u64::from(b.size);
            assert!(
                a_end <= u64::from(b.base) || b_end <= u64::from(a.base),
                "address map regions overlap: {a:?} and {b:?}"
            );
        }
    }
}
