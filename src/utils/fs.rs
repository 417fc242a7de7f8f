// src/utils/fs.rs

//! Whole-file reads and writes.
//!
//! Handles are opened and closed inside each call, so no file stays open
//! past an error.

use crate::utils::error::Result;
use log::trace;
use std::fs;
use std::path::Path;

/// Reads the entire file at `path`.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let buffer = fs::read(path)?;
    trace!(
        "Read {} bytes from '{}', head: {:02x?}",
        buffer.len(),
        path.display(),
        &buffer[..buffer.len().min(16)]
    );
    Ok(buffer)
}

/// Creates or truncates `path` and writes `data` to it.
pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data)?;
    trace!("Wrote {} bytes to '{}'", data.len(), path.display());
    Ok(())
}
