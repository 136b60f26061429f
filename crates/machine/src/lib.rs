//! Machine layer for a small RISC-V system emulator.
//!
//! This crate composes an execution core with peripheral devices behind one
//! physical address space and drives the main execution loop. It provides:
//! 1. **SoC:** Bus router, RAM, and MMIO devices (CLINT, PLIC, two UARTs).
//! 2. **Console:** A terminal bridge for UART byte I/O with throttled,
//!    nonblocking reads and raw-mode lifetime management.
//! 3. **Core:** The narrow execution-core interface plus a bundled
//!    machine-mode RV32 interpreter hart.
//! 4. **Simulation:** Image loading and the per-cycle execution driver.

/// Common types and constants (memory map, error taxonomy).
pub mod common;
/// Machine configuration.
pub mod config;
/// Terminal bridge for the primary UART.
pub mod console;
/// Execution-core interface and the bundled interpreter hart.
pub mod core;
/// Image loading and the execution driver.
pub mod sim;
/// System-on-chip (machine builder, bus, devices, memory).
pub mod soc;

/// Machine configuration; use [`MachineConfig::default`] for the stock layout.
pub use crate::config::MachineConfig;
/// Bundled execution core; construct with [`Hart::new`].
pub use crate::core::Hart;
/// Top-level machine (bus, RAM, devices); construct with [`Machine::new`].
pub use crate::soc::Machine;
