//! Backing storage for guest RAM.
//!
//! This module provides a safe wrapper around raw memory allocation for the
//! system RAM. On Unix systems the buffer is an anonymous `mmap`, so the
//! 128 MiB default region is allocated lazily by the OS as the guest touches
//! it; other platforms fall back to a zeroed `Vec`.

use std::slice;

/// A fixed-size, zero-initialized byte buffer for guest RAM.
pub struct RamBuffer {
    ptr: *mut u8,
    size: usize,
    is_mmap: bool,
}

// SAFETY: the buffer is exclusively owned and all access goes through
// `&self`/`&mut self` methods; the raw pointer never escapes.
unsafe impl Send for RamBuffer {}

impl RamBuffer {
    /// Creates a new buffer of the given size.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails; RAM is created once at startup and
    /// the machine cannot exist without it.
    pub fn new(size: usize) -> Self {
        #[cfg(unix)]
        {
            use std::ptr;
            // SAFETY: anonymous private mapping with no file descriptor;
            // arguments are well-formed for any `size`.
            let ptr = unsafe {
                libc::mmap(
                    ptr::null_mut(),
                    size,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };

            assert!(
                ptr != libc::MAP_FAILED,
                "failed to mmap RAM buffer of size {size}"
            );

            Self {
                ptr: ptr.cast::<u8>(),
                size,
                is_mmap: true,
            }
        }

        #[cfg(not(unix))]
        {
            let mut vec = vec![0u8; size];
            let ptr = vec.as_mut_ptr();
            std::mem::forget(vec);
            Self {
                ptr,
                size,
                is_mmap: false,
            }
        }
    }

    /// Returns the size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns whether the buffer has zero size.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns a shared view of `len` bytes starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds the buffer; callers resolve ranges
    /// against the region table before reading.
    pub fn read_slice(&self, offset: usize, len: usize) -> &[u8] {
        assert!(offset + len <= self.size, "RAM read out of bounds");
        // SAFETY: the range was just bounds-checked against the allocation.
        unsafe { slice::from_raw_parts(self.ptr.add(offset), len) }
    }

    /// Copies `data` into the buffer starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds the buffer.
    pub fn write_slice(&mut self, offset: usize, data: &[u8]) {
        assert!(offset + data.len() <= self.size, "RAM write out of bounds");
        // SAFETY: the range was just bounds-checked; `data` cannot overlap
        // the mapping because the mapping is exclusively owned.
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), self.ptr.add(offset), data.len());
        }
    }
}

impl Drop for RamBuffer {
    fn drop(&mut self) {
        if self.is_mmap {
            #[cfg(unix)]
            // SAFETY: `ptr`/`size` describe the mapping created in `new`.
            unsafe {
                let _ = libc::munmap(self.ptr.cast(), self.size);
            }
        } else {
            #[cfg(not(unix))]
            // SAFETY: reconstructs the Vec forgotten in `new`.
            unsafe {
                let _ = Vec::from_raw_parts(self.ptr, self.size, self.size);
            }
        }
    }
}

impl std::fmt::Debug for RamBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RamBuffer")
            .field("size", &self.size)
            .field("is_mmap", &self.is_mmap)
            .finish()
    }
}
