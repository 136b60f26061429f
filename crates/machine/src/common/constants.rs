//! Fixed physical memory map and cadence constants.
//!
//! The bases and sizes below are guest-visible ABI: firmware and the device
//! tree both hard-code them, so they are constants rather than configuration.

/// Base physical address of main system RAM.
pub const RAM_BASE: u32 = 0x8000_0000;

/// Default size of main system RAM (128 MiB).
pub const RAM_SIZE: usize = 128 * 1024 * 1024;

/// Offset within RAM where the device-tree blob is placed (32 MiB).
pub const DTB_OFFSET: u32 = 0x0200_0000;

/// Base physical address of the interrupt controller (PLIC).
pub const PLIC_BASE: u32 = 0x0C00_0000;

/// Size of the interrupt controller's register window.
pub const PLIC_SIZE: u32 = 0x0400_0000;

/// Base physical address of the timer unit (CLINT).
pub const CLINT_BASE: u32 = 0x0200_0000;

/// Size of the timer unit's register window.
pub const CLINT_SIZE: u32 = 0x1_0000;

/// Base physical address of the primary UART.
pub const UART0_BASE: u32 = 0x0300_0000;

/// Base physical address of the secondary UART.
pub const UART1_BASE: u32 = 0x0600_0000;

/// Size of one UART register window.
pub const UART_SIZE: u32 = 0x100;

/// Interrupt-controller source id of the primary UART.
pub const UART0_IRQ: u32 = 1;

/// Interrupt-controller source id of the secondary UART.
pub const UART1_IRQ: u32 = 2;

/// Mask for the free-running RTC cadence counter (period 4096).
///
/// The guest-visible time register advances once per wrap, decoupling the
/// step rate from the RTC rate.
pub const RTC_CADENCE_MASK: u32 = 0xFFF;

/// Mask for the console read-throttle counter (period 4096).
///
/// A real terminal read is attempted only when the counter wraps, so guest
/// busy-polling of the UART does not turn into one host syscall per poll.
pub const READ_THROTTLE_MASK: u16 = 0xFFF;

/// Hart id passed to the execution core at reset.
pub const BOOT_HART: u32 = 0;
