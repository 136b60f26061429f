//! Guest RAM region.
//!
//! Wraps the raw [`RamBuffer`] as a bus target and provides the truncating
//! image copy used by the loader.

/// Raw buffer implementation (mmap on Unix, `Vec` elsewhere).
pub mod buffer;

use self::buffer::RamBuffer;
use crate::common::BusFault;
use crate::soc::traits::BusTarget;

/// Main system memory.
#[derive(Debug)]
pub struct Ram {
    buffer: RamBuffer,
}

impl Ram {
    /// Creates zero-initialized RAM of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            buffer: RamBuffer::new(size),
        }
    }

    /// Returns the RAM size in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns whether the RAM region has zero size.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Copies an image into RAM at `offset`, truncating to the remaining
    /// capacity.
    ///
    /// Returns the number of bytes actually copied. An offset at or past the
    /// end of RAM copies nothing.
    pub fn load_at(&mut self, offset: usize, data: &[u8]) -> usize {
        let capacity = self.buffer.len().saturating_sub(offset);
        let count = data.len().min(capacity);
        if count > 0 {
            self.buffer.write_slice(offset, &data[..count]);
        }
        count
    }

    /// Returns a shared view of `len` bytes starting at `offset`.
    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        self.buffer.read_slice(offset, len)
    }
}

impl BusTarget for Ram {
    /// Copies bytes out of the backing store. Always succeeds for in-window
    /// offsets; the router guarantees the range fits before forwarding.
    fn load(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), BusFault> {
        buf.copy_from_slice(self.buffer.read_slice(offset as usize, buf.len()));
        Ok(())
    }

    /// Copies bytes into the backing store.
    fn store(&mut self, offset: u32, buf: &[u8]) -> Result<(), BusFault> {
        self.buffer.write_slice(offset as usize, buf);
        Ok(())
    }
}
