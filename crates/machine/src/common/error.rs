//! Error taxonomy for the machine layer.
//!
//! Three distinct failure kinds exist here:
//! 1. **Bus faults:** A physical access outside every mapped region. These
//!    propagate to the execution core, whose trap handling owns them; the
//!    machine layer never recovers from one itself.
//! 2. **Channel outcomes:** A UART byte transfer that moved nothing. An empty
//!    read is the ordinary result of polling, not a failure.
//! 3. **Load errors:** An image file that cannot be read at startup. Fatal;
//!    there is nothing to emulate without it.

use std::path::PathBuf;

use thiserror::Error;

/// A physical access that no mapped region claims.
///
/// Returned by the bus router when `[addr, addr + width)` does not fall
/// entirely inside RAM or a device window, and by devices that reject an
/// access within their window. The execution core converts this into an
/// access-fault trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("physical access outside every mapped region")]
pub struct BusFault;

/// Outcome of a one-byte channel transfer that moved no byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// No byte is ready. The normal result of a throttled or empty poll.
    #[error("no byte pending")]
    Empty,

    /// The channel has no backend attached; every transfer fails.
    #[error("channel has no backend")]
    Disconnected,
}

/// An image file that could not be read at startup.
#[derive(Debug, Error)]
#[error("unable to load image {path}: {source}")]
pub struct LoadError {
    /// Path of the image that failed to load.
    pub path: PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: std::io::Error,
}
