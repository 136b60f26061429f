//! Per-cycle execution driver.
//!
//! Owns the execution core and the machine side by side and sequences each
//! cycle: advance the RTC cadence, execute one core step, update the devices,
//! and deliver the aggregated interrupt lines. Nothing in the cycle aborts
//! the loop; bus and device errors are the core's traps to handle.

use tracing::debug;

use crate::common::constants::{BOOT_HART, DTB_OFFSET, RAM_BASE};
use crate::core::ExecutionCore;
use crate::soc::Machine;

/// Execution driver: core + machine + optional instruction bound.
#[derive(Debug)]
pub struct Runner<C> {
    core: C,
    machine: Machine,
    limit: Option<u64>,
    executed: u64,
}

impl<C: ExecutionCore> Runner<C> {
    /// Creates the driver and resets the core to the boot convention
    /// (hart 0, device-tree pointer at the fixed RAM offset, entry at the
    /// start of RAM).
    ///
    /// With `limit = Some(n)` the loop terminates after exactly `n`
    /// iterations; with `None` it runs indefinitely. The bound exists to
    /// make runs with interactive terminal input reproducible.
    pub fn new(mut core: C, machine: Machine, limit: Option<u64>) -> Self {
        core.reset(RAM_BASE, BOOT_HART, RAM_BASE + DTB_OFFSET);
        Self {
            core,
            machine,
            limit,
            executed: 0,
        }
    }

    /// Executes one cycle, strictly ordered: RTC cadence, one core step,
    /// device updates, interrupt delivery (unconditional, including zero).
    pub fn step(&mut self) {
        self.machine.tick_rtc();
        self.core.step(self.machine.bus_mut());
        let lines = self.machine.poll_devices();
        self.core.set_interrupts(lines);
        self.executed += 1;
    }

    /// Runs until the instruction bound is reached; forever without one.
    pub fn run(&mut self) {
        while !self.finished() {
            self.step();
        }
        debug!(executed = self.executed, "instruction bound reached");
    }

    /// Returns the number of cycles executed so far.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Returns the machine.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Returns the machine mutably.
    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// Returns the execution core.
    pub fn core(&self) -> &C {
        &self.core
    }

    fn finished(&self) -> bool {
        self.limit.is_some_and(|n| self.executed >= n)
    }
}
