//! Image file loading.
//!
//! Reads firmware and device-tree images from disk. No format validation
//! happens here: images are opaque byte blobs copied verbatim into RAM by
//! the machine.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::common::LoadError;

/// Reads an image file into a byte vector.
///
/// # Errors
///
/// Returns [`LoadError`] when the file cannot be read; there is nothing to
/// emulate without the image, so callers treat this as fatal at startup.
pub fn load_image(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| LoadError {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = data.len(), "image loaded");
    Ok(data)
}
