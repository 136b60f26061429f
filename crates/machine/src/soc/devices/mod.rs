//! Memory-mapped I/O devices.
//!
//! Implementations of the peripherals attached to the bus router: the timer
//! unit (CLINT), the interrupt controller (PLIC), and the UART serial ports.

/// Core Local Interruptor (timer and software-interrupt unit).
pub mod clint;

/// Platform-Level Interrupt Controller.
pub mod plic;

/// 16550-style UART serial port and its byte-channel backends.
pub mod uart;

pub use clint::Clint;
pub use plic::Plic;
pub use uart::{ByteChannel, NullChannel, Uart};

pub use crate::soc::traits::BusTarget;
