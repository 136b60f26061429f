//! System-on-chip components.
//!
//! The bus router, guest RAM, MMIO devices, and the machine builder that
//! assembles them and owns the per-cycle device update.

/// Machine builder and top-level `Machine` type.
pub mod builder;

/// Memory-mapped I/O device implementations.
pub mod devices;

/// Bus router and address-space dispatch.
pub mod interconnect;

/// Guest RAM region and backing buffer.
pub mod memory;

/// Bus-target trait for memory-mapped access.
pub mod traits;

pub use builder::Machine;
