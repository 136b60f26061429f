//! Common types shared across the machine layer.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Constants:** The fixed physical memory map and cadence periods.
//! 2. **Errors:** The machine layer's error taxonomy.

/// Fixed memory map and cadence constants.
pub mod constants;

/// Error types for bus access, byte channels, and image loading.
pub mod error;

pub use error::{BusFault, ChannelError, LoadError};
