//! Machine configuration.
//!
//! Only the RAM size is configurable; the rest of the memory map is
//! guest-visible ABI and lives in [`crate::common::constants`]. Configuration
//! deserializes from JSON/TOML via serde or falls back to
//! [`MachineConfig::default`].

use serde::Deserialize;

use crate::common::constants;

/// Top-level machine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Size of main system RAM in bytes.
    ///
    /// The device-tree blob is placed at a fixed 32 MiB offset, so images
    /// that carry one need at least that much RAM.
    pub ram_size: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            ram_size: constants::RAM_SIZE,
        }
    }
}
