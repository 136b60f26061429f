//! Machine assembly and per-cycle device state.
//!
//! The [`Machine`] owns the bus (and through it RAM and every device), the
//! real-time-counter cadence, and the interrupt aggregation performed after
//! each CPU step. It performs:
//! 1. **Construction:** Builds the bus with the fixed memory map and the two
//!    UART channel backends.
//! 2. **Loading:** Copies the firmware and device-tree images into RAM.
//! 3. **RTC cadence:** Advances the timer unit once per 4096 calls.
//! 4. **Aggregation:** Updates the UARTs, raises their interrupt-controller
//!    sources, and composes the interrupt lines for delivery.

use tracing::debug;

use crate::common::constants::{
    DTB_OFFSET, RTC_CADENCE_MASK, UART0_IRQ, UART1_IRQ,
};
use crate::config::MachineConfig;
use crate::core::IrqLines;
use crate::soc::devices::ByteChannel;
use crate::soc::interconnect::SystemBus;

/// Top-level machine instance: bus, RAM, devices, and cadence state.
#[derive(Debug)]
pub struct Machine {
    bus: SystemBus,
    rtc_cadence: u32,
}

impl Machine {
    /// Builds a machine from configuration and the two UART backends.
    ///
    /// The primary UART is normally bridged to the terminal and the
    /// secondary one left on [`crate::soc::devices::NullChannel`].
    pub fn new(
        config: &MachineConfig,
        uart0: Box<dyn ByteChannel>,
        uart1: Box<dyn ByteChannel>,
    ) -> Self {
        debug!(ram_size = config.ram_size, "building machine");
        Self {
            bus: SystemBus::new(config.ram_size, uart0, uart1),
            rtc_cadence: 0,
        }
    }

    /// Returns the bus.
    pub fn bus(&self) -> &SystemBus {
        &self.bus
    }

    /// Returns the bus mutably; the execution core steps against this.
    pub fn bus_mut(&mut self) -> &mut SystemBus {
        &mut self.bus
    }

    /// Copies a firmware image to the start of RAM, truncated to capacity.
    ///
    /// Returns the number of bytes copied.
    pub fn load_firmware(&mut self, image: &[u8]) -> usize {
        let copied = self.bus.ram_mut().load_at(0, image);
        debug!(bytes = copied, "firmware image loaded");
        copied
    }

    /// Copies a device-tree blob to its fixed offset within RAM, truncated
    /// to the remaining capacity.
    ///
    /// Returns the number of bytes copied.
    pub fn load_dtb(&mut self, blob: &[u8]) -> usize {
        let copied = self.bus.ram_mut().load_at(DTB_OFFSET as usize, blob);
        debug!(bytes = copied, "device tree loaded");
        copied
    }

    /// Advances the real-time-counter cadence by one call.
    ///
    /// The counter wraps at 4096; only on wrap does the timer unit's time
    /// register advance, so the guest-visible RTC rate is decoupled from the
    /// step rate.
    pub fn tick_rtc(&mut self) {
        self.rtc_cadence = (self.rtc_cadence + 1) & RTC_CADENCE_MASK;
        if self.rtc_cadence == 0 {
            self.bus.clint_mut().bump_mtime();
        }
    }

    /// Updates the devices and composes the interrupt lines for hart 0.
    ///
    /// Each UART is updated once; a pending receive/transmit condition
    /// raises its interrupt-controller source. The returned value is the OR
    /// of the software, timer, and external lines and is meant to be
    /// delivered to the core unconditionally, including when empty.
    pub fn poll_devices(&mut self) -> IrqLines {
        if self.bus.uart0_mut().update() {
            self.bus.plic_mut().raise(UART0_IRQ);
        }
        if self.bus.uart1_mut().update() {
            self.bus.plic_mut().raise(UART1_IRQ);
        }

        let mut lines = IrqLines::NONE;
        if self.bus.clint().software_pending(0) {
            lines |= IrqLines::SOFTWARE;
        }
        if self.bus.clint().timer_pending(0) {
            lines |= IrqLines::TIMER;
        }
        if self.bus.plic().external_pending(0) {
            lines |= IrqLines::EXTERNAL;
        }
        lines
    }
}
