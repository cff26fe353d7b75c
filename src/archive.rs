//! Platform-tools archive installation
//!
//! The archive is downloaded to a scratch file, unpacked into the tools
//! directory and flattened when its payload sits one directory level deep.
//! An existing tools directory counts as installed; its contents are not
//! verified.

use std::fs;
use std::path::Path;

use zip::ZipArchive;

use crate::error::{ApkError, Result};
use crate::temp;
use crate::transfer::{Downloader, Progress};

/// Result of an install or extract call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// The tools directory already existed; nothing was fetched or written
    AlreadyInstalled,
    /// The archive was unpacked into the tools directory
    Extracted,
}

/// Download the archive at `source_url` and extract it into `extract_dir`.
///
/// The scratch archive is removed afterwards whether extraction succeeded or not.
pub fn install_archive(
    downloader: &dyn Downloader,
    source_url: &str,
    extract_dir: &Path,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<ArchiveOutcome> {
    if extract_dir.exists() {
        log::info!("{} already exists, skipping download", extract_dir.display());
        return Ok(ArchiveOutcome::AlreadyInstalled);
    }

    let scratch = temp::scratch_file("platform-tools-", ".zip")?;
    let scratch_path = scratch.to_path_buf();
    downloader.fetch(source_url, &scratch_path, on_progress)?;

    let extracted = ensure_extracted(&scratch_path, extract_dir);
    let cleanup = scratch
        .close()
        .map_err(|e| ApkError::io("Failed to remove", &scratch_path, &e));
    log::debug!("Removed scratch archive {}", scratch_path.display());

    let outcome = extracted?;
    cleanup?;
    Ok(outcome)
}

/// Extract `archive` into `extract_dir` unless the directory already exists.
///
/// A directory created by a failed extraction is removed again.
pub fn ensure_extracted(archive: &Path, extract_dir: &Path) -> Result<ArchiveOutcome> {
    if extract_dir.exists() {
        return Ok(ArchiveOutcome::AlreadyInstalled);
    }

    fs::create_dir_all(extract_dir)
        .map_err(|e| ApkError::io("Failed to create", extract_dir, &e))?;

    let result = unpack(archive, extract_dir)
        .and_then(|()| normalize_layout(extract_dir, crate::config::NESTED_TOOLS_DIR));

    if let Err(e) = result {
        if let Err(cleanup) = fs::remove_dir_all(extract_dir) {
            log::warn!(
                "Failed to remove partial extraction {}: {cleanup}",
                extract_dir.display()
            );
        }
        return Err(e);
    }

    log::info!("Extracted {} into {}", archive.display(), extract_dir.display());
    Ok(ArchiveOutcome::Extracted)
}

fn unpack(archive: &Path, extract_dir: &Path) -> Result<()> {
    let file = fs::File::open(archive).map_err(|e| ApkError::extraction(archive, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| ApkError::extraction(archive, e))?;
    log::debug!("Archive {} has {} entries", archive.display(), zip.len());
    zip.extract(extract_dir)
        .map_err(|e| ApkError::extraction(archive, e))
}

/// Move the children of `extract_dir/nested_name` up into `extract_dir`.
///
/// Does nothing when the nested directory does not exist. Fails without moving
/// anything if a child would overwrite an existing entry.
pub fn normalize_layout(extract_dir: &Path, nested_name: &str) -> Result<()> {
    let nested = extract_dir.join(nested_name);
    if !nested.is_dir() {
        return Ok(());
    }

    let children = fs::read_dir(&nested)
        .and_then(|entries| entries.collect::<std::io::Result<Vec<_>>>())
        .map_err(|e| ApkError::io("Failed to read", &nested, &e))?;

    for child in &children {
        let target = extract_dir.join(child.file_name());
        if target.exists() {
            return Err(ApkError::extraction(
                &nested,
                format!("'{}' already exists in {}", target.display(), extract_dir.display()),
            ));
        }
    }

    for child in &children {
        let target = extract_dir.join(child.file_name());
        fs::rename(child.path(), &target)
            .map_err(|e| ApkError::io("Failed to move", &child.path(), &e))?;
    }

    fs::remove_dir(&nested).map_err(|e| ApkError::io("Failed to remove", &nested, &e))?;
    log::debug!("Flattened {} into {}", nested.display(), extract_dir.display());
    Ok(())
}
