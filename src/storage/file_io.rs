//! File I/O utilities with atomic writes
//!
//! Provides raw byte persistence for wrapped keys and payloads. Writes go to
//! a temp file in the target directory which is then renamed over the
//! target, so a crash never leaves a half-written key or ciphertext.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{HybridError, HybridResult};

/// Read a whole file
pub fn load_bytes<P: AsRef<Path>>(path: P) -> HybridResult<Vec<u8>> {
    let path = path.as_ref();
    let data = fs::read(path)
        .map_err(|e| HybridError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    debug!(path = %path.display(), bytes = data.len(), "read file");
    Ok(data)
}

/// Write a whole file atomically
pub fn save_bytes<P: AsRef<Path>>(path: P, data: &[u8]) -> HybridResult<()> {
    write_atomic(path.as_ref(), data, None)
}

/// Write `data` to `path` via temp file + fsync + rename
///
/// `mode` sets Unix permissions on the new file and is ignored elsewhere.
pub(crate) fn write_atomic(path: &Path, data: &[u8], mode: Option<u32>) -> HybridResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            HybridError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = temp_path_for(path)?;
    let _ = fs::remove_file(&temp_path);

    let mut file = open_new(&temp_path, mode)
        .map_err(|e| HybridError::Io(format!("Failed to create temp file: {}", e)))?;

    file.write_all(data)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            HybridError::Io(format!("Failed to write {}: {}", path.display(), e))
        })?;

    fs::rename(&temp_path, path).map_err(|e| {
        // Try to clean up temp file if rename fails
        let _ = fs::remove_file(&temp_path);
        HybridError::Io(format!("Failed to rename temp file to {}: {}", path.display(), e))
    })?;

    debug!(path = %path.display(), bytes = data.len(), "wrote file");
    Ok(())
}

fn temp_path_for(path: &Path) -> HybridResult<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| HybridError::Io(format!("Not a file path: {}", path.display())))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

#[cfg(unix)]
fn open_new(path: &Path, mode: Option<u32>) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    if let Some(mode) = mode {
        options.mode(mode);
    }
    options.open(path)
}

#[cfg(not(unix))]
fn open_new(path: &Path, _mode: Option<u32>) -> std::io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}
