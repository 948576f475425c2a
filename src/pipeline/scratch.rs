//! Ephemeral storage for per-chunk results.

use crate::error::{FlowError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Separator between reassembled chunk results.
pub const RESULT_SEPARATOR: &str = "\n\n";

/// A scratch directory holding one file per chunk result.
///
/// The directory and everything in it is removed when the value is dropped,
/// whether the pipeline finished or bailed out with `?`.
#[derive(Debug)]
pub struct ScratchSpace {
    dir: TempDir,
    staged: Vec<PathBuf>,
}

impl ScratchSpace {
    /// Create a scratch directory under `root`, or under the system temp
    /// directory when `root` is `None`.
    pub fn create(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("chunkflow-");

        let dir = match root {
            Some(root) => {
                fs::create_dir_all(root).map_err(|e| {
                    FlowError::Io(format!(
                        "failed to create scratch root '{}': {}",
                        root.display(),
                        e
                    ))
                })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| FlowError::Io(format!("failed to create scratch directory: {}", e)))?;

        Ok(Self {
            dir,
            staged: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Store the result of chunk `index` (0-based).
    pub fn stage(&mut self, index: usize, text: &str) -> Result<()> {
        let path = self.dir.path().join(format!("chunk_{:03}.md", index + 1));
        fs::write(&path, text).map_err(|e| {
            FlowError::Io(format!(
                "failed to stage chunk result '{}': {}",
                path.display(),
                e
            ))
        })?;
        self.staged.push(path);
        Ok(())
    }

    /// Read every staged result back in order and join them.
    pub fn collect(&self) -> Result<String> {
        let mut parts = Vec::with_capacity(self.staged.len());
        for path in &self.staged {
            let part = fs::read_to_string(path).map_err(|e| {
                FlowError::Io(format!(
                    "failed to read staged chunk result '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            parts.push(part);
        }
        Ok(parts.join(RESULT_SEPARATOR).trim().to_string())
    }
}
