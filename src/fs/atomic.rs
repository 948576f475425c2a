//! Atomic file writes.
//!
//! Content goes to a temporary file created next to the target (so both live
//! on the same filesystem), is synced to disk, and is then renamed over the
//! target. Readers see either the old file or the complete new one.
//!
//! Parent directories are created as needed. If anything fails the
//! temporary file is removed when it is dropped.

use crate::error::{FlowError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write bytes to `path`, creating parent directories.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .ok_or_else(|| FlowError::Io(format!("invalid output path '{}'", path.display())))?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| {
            FlowError::Io(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name.to_string_lossy()))
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| {
            FlowError::Io(format!(
                "failed to create temporary file in '{}': {}",
                parent.display(),
                e
            ))
        })?;

    write_and_sync(&mut temp, content)?;

    temp.persist(path).map_err(|e| {
        FlowError::Io(format!(
            "failed to atomically replace '{}': {}",
            path.display(),
            e.error
        ))
    })?;

    // Persist the directory entry as well; best effort.
    if let Ok(dir) = File::open(parent) {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// Atomically write a string to `path`.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

fn write_and_sync(temp: &mut NamedTempFile, content: &[u8]) -> Result<()> {
    temp.write_all(content)
        .map_err(|e| FlowError::Io(format!("failed to write temporary file: {}", e)))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| FlowError::Io(format!("failed to sync temporary file to disk: {}", e)))
}
