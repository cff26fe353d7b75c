//! Download, extract and install orchestration
//!
//! A [`Pipeline`] borrows every collaborator it needs for one run: settings,
//! the downloader, the release source, the package installer and the
//! presenter. Each operation runs to completion before the next begins.
//!
//! Single-item operations (`run_single_url`, `run_local_file`) return the
//! first error they hit. Bundle runs report failures per line and keep going;
//! see [`bundle`].

pub mod bundle;


use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::{self, ArchiveOutcome};
use crate::config::{BUNDLE_EXTENSION, BUNDLE_MARKER, PACKAGE_EXTENSION, Settings};
use crate::device::{InstallResult, PackageInstaller};
use crate::error::{ApkError, Result};
use crate::release::ReleaseSource;
use crate::transfer::{DownloadTask, Downloader};
use crate::ui::{Notice, Presenter};

/// Prefix every direct package URL must start with
const RELEASE_URL_PREFIX: &str = "https://github.com/";

/// Options of the confirmation menu shown after a download
pub const CONFIRM_OPTIONS: [&str; 2] = ["Install", "Cancel"];

/// Result of a single-item run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The package was installed on the device
    Installed(PathBuf),
    /// The install command ran and reported failure
    Failed(InstallResult),
    /// The user declined the install; the download was removed
    Cancelled,
}

/// Collaborators for one orchestrated run
pub struct Pipeline<'a> {
    pub settings: &'a Settings,
    pub downloader: &'a dyn Downloader,
    pub releases: &'a dyn ReleaseSource,
    pub installer: &'a dyn PackageInstaller,
    pub presenter: &'a dyn Presenter,
}

/// Whether `url` points directly at a package on the release host.
pub fn is_valid_release_url(url: &str) -> bool {
    url.starts_with(RELEASE_URL_PREFIX) && url.ends_with(PACKAGE_EXTENSION)
}

/// Last path segment of a URL or asset name
fn file_name_of(input: &str) -> Option<&str> {
    input
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

/// Bundle files in `dir`, sorted by file name.
///
/// A bundle file is any regular file whose name contains the bundle marker and
/// ends with the bundle extension.
pub fn find_bundle_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| ApkError::io("Failed to read", dir, &e))?;

    let mut bundles = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ApkError::io("Failed to read", dir, &e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.contains(BUNDLE_MARKER)
            && name.ends_with(BUNDLE_EXTENSION)
            && entry.path().is_file()
        {
            bundles.push(entry.path());
        }
    }

    bundles.sort();
    log::debug!("Found {} bundle file(s) in {}", bundles.len(), dir.display());
    Ok(bundles)
}

impl Pipeline<'_> {
    /// Install the platform tools unless they are already present.
    pub fn setup_platform_tools(&self) -> Result<ArchiveOutcome> {
        let tools_dir = self.settings.tools_dir();
        if tools_dir.exists() {
            self.presenter
                .notify(Notice::Success, "ADB is already installed.");
            return Ok(ArchiveOutcome::AlreadyInstalled);
        }

        self.presenter.notify(Notice::Info, "Downloading ADB...");
        let result = archive::install_archive(
            self.downloader,
            &self.settings.platform_tools_url,
            &tools_dir,
            &mut |progress| self.presenter.show_progress(progress),
        );
        self.presenter.finish_progress();

        let outcome = result?;
        self.presenter
            .notify(Notice::Success, "ADB installed successfully!");
        Ok(outcome)
    }

    /// Download a package from a direct URL and install it after confirmation.
    ///
    /// Invalid URLs fail before any network request. Declining, dismissing
    /// or aborting the confirmation deletes the downloaded file.
    pub fn run_single_url(&self, url: &str) -> Result<Outcome> {
        if !is_valid_release_url(url) {
            return Err(ApkError::invalid_input(
                url,
                format!("expected a {RELEASE_URL_PREFIX} URL ending in {PACKAGE_EXTENSION}"),
            ));
        }
        let name = file_name_of(url)
            .ok_or_else(|| ApkError::invalid_input(url, "URL has no file name"))?;

        let destination = self.package_path(name)?;
        self.presenter.notify(Notice::Info, "Downloading...");
        self.download(url, &destination)?;

        let choice = self
            .presenter
            .show_menu("Successfully downloaded!", &CONFIRM_OPTIONS);
        match choice {
            Ok(Some(0)) => self.install_package(&destination),
            Ok(_) => {
                self.discard(&destination)?;
                Ok(Outcome::Cancelled)
            }
            Err(e) => {
                self.discard(&destination)?;
                Err(e)
            }
        }
    }

    /// Delete a downloaded package the user did not confirm
    fn discard(&self, package: &Path) -> Result<()> {
        fs::remove_file(package).map_err(|e| ApkError::io("Failed to remove", package, &e))?;
        self.presenter
            .notify(Notice::Info, &format!("Removed {}", package.display()));
        Ok(())
    }

    /// Install a package file named relative to the base directory.
    pub fn run_local_file(&self, name: &str) -> Result<Outcome> {
        let package = self.settings.local_package(name.trim());
        self.install_package(&package)
    }

    /// Install `package` on the connected device.
    ///
    /// Requires at least one device in the ready state; otherwise the install
    /// command is never run.
    pub fn install_package(&self, package: &Path) -> Result<Outcome> {
        let devices = self.installer.list_devices()?;
        if !devices.iter().any(|device| device.is_ready()) {
            log::debug!("Devices reported: {devices:?}");
            return Err(ApkError::NoDeviceConnected);
        }

        let label = package
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| package.display().to_string());
        self.presenter
            .notify(Notice::Info, &format!("Installing {label}..."));

        let result = self.installer.install(package)?;
        if result.succeeded {
            self.presenter
                .notify(Notice::Success, &format!("{label} installed successfully!"));
            Ok(Outcome::Installed(package.to_path_buf()))
        } else {
            self.presenter.notify(
                Notice::Error,
                &format!("Failed to install {label}: {}", result.failure_detail()),
            );
            Ok(Outcome::Failed(result))
        }
    }

    /// Destination for a downloaded package, creating the package directory.
    fn package_path(&self, file_name: &str) -> Result<PathBuf> {
        let dir = self.settings.package_dir();
        fs::create_dir_all(&dir).map_err(|e| ApkError::io("Failed to create", &dir, &e))?;
        Ok(dir.join(file_name))
    }

    /// Fetch `url` into `destination` with progress; a partial file is removed on failure.
    fn download(&self, url: &str, destination: &Path) -> Result<DownloadTask> {
        let result = self.downloader.fetch(url, destination, &mut |progress| {
            self.presenter.show_progress(progress);
        });
        self.presenter.finish_progress();

        if result.is_err() && destination.exists() {
            if let Err(e) = fs::remove_file(destination) {
                log::warn!("Failed to remove partial download {}: {e}", destination.display());
            }
        }
        result
    }
}
