//! Bus-target trait for memory-mapped access.
//!
//! Every region behind the bus router implements [`BusTarget`]. The contract
//! is byte-exact: the caller chooses the access width through the buffer
//! length and the target moves exactly that many bytes, little-endian, or
//! fails without touching anything.

use crate::common::BusFault;

/// A memory-mapped target reachable through the bus router.
///
/// Offsets are relative to the target's own window; the router rebases the
/// physical address before forwarding. An access either fully succeeds or
/// fully fails with no partial mutation.
pub trait BusTarget {
    /// Reads `buf.len()` bytes at the given window-relative offset.
    ///
    /// # Errors
    ///
    /// Returns [`BusFault`] if the target rejects the offset or width.
    fn load(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), BusFault>;

    /// Writes `buf.len()` bytes at the given window-relative offset.
    ///
    /// # Errors
    ///
    /// Returns [`BusFault`] if the target rejects the offset or width.
    fn store(&mut self, offset: u32, buf: &[u8]) -> Result<(), BusFault>;
}
