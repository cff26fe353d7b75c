//! Scratch files for downloads that must not outlive a single operation.
//!
//! Scratch files are always created under an absolute system temp directory so a
//! relative TMPDIR (e.g. TMPDIR=tmp) never drops archives into the base directory.

use std::env;
use std::path::PathBuf;

use tempfile::TempPath;

use crate::error::{ApkError, Result};

/// Absolute directory suitable for scratch files.
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        return t;
    }

    #[cfg(windows)]
    {
        env::var("TEMP")
            .or_else(|_| env::var("TMP"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/tmp")
    }
}

/// Reserve a uniquely named, closed scratch file.
///
/// The file is deleted when the returned path is dropped; call
/// [`TempPath::close`] to delete it explicitly and observe failures.
pub fn scratch_file(prefix: &str, suffix: &str) -> Result<TempPath> {
    let base = temp_dir_base();
    tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .tempfile_in(&base)
        .map(tempfile::NamedTempFile::into_temp_path)
        .map_err(|e| ApkError::io("Failed to create scratch file in", &base, &e))
}
