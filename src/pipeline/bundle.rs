//! Batch installs from bundle files
//!
//! A bundle file lists one repository URL per line. Blank lines and lines
//! starting with `#` are ignored. Every remaining line is resolved to the
//! first package asset of the repository's latest release, downloaded and
//! installed. A failing line is reported and the run moves on.

use std::fs;
use std::path::{Path, PathBuf};

use super::{Outcome, Pipeline, file_name_of, find_bundle_files};
use crate::config::PACKAGE_EXTENSION;
use crate::error::{ApkError, Result};
use crate::release::{self, RepositoryReference};
use crate::ui::Notice;

/// What happened to one bundle line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Installed,
    /// The install command reported failure
    InstallFailed(String),
    /// Nothing was downloaded: the release or its package could not be resolved
    Skipped(String),
    /// Download or device error after resolution
    Failed(String),
}

impl EntryOutcome {
    /// Why the line was not installed
    pub fn reason(&self) -> Option<&str> {
        match self {
            EntryOutcome::Installed => None,
            EntryOutcome::InstallFailed(reason)
            | EntryOutcome::Skipped(reason)
            | EntryOutcome::Failed(reason) => Some(reason),
        }
    }
}

/// Outcome of a bundle line together with the line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub line_number: usize,
    pub url: String,
    pub outcome: EntryOutcome,
}

/// Per-line results of a bundle run, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleReport {
    pub entries: Vec<EntryReport>,
}

impl BundleReport {
    fn count(&self, predicate: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| predicate(&e.outcome)).count()
    }

    pub fn installed(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Installed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::InstallFailed(_) | EntryOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Skipped(_)))
    }

    pub fn summary(&self) -> String {
        format!(
            "Bundle finished: {} installed, {} failed, {} skipped",
            self.installed(),
            self.failed(),
            self.skipped()
        )
    }
}

/// Non-comment lines of a bundle file with their 1-based line numbers
pub fn bundle_lines(contents: &str) -> Vec<(usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

impl Pipeline<'_> {
    /// Process every line of `bundle_file`.
    ///
    /// Only an unreadable bundle file fails the run.
    pub fn run_bundle(&self, bundle_file: &Path) -> Result<BundleReport> {
        let contents = fs::read_to_string(bundle_file).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ApkError::FileNotFound {
                    path: bundle_file.display().to_string(),
                }
            } else {
                ApkError::io("Failed to read", bundle_file, &e)
            }
        })?;

        let mut report = BundleReport::default();
        for (line_number, url) in bundle_lines(&contents) {
            log::info!("Bundle line {line_number}: {url}");
            let outcome = self.process_entry(url);
            report.entries.push(EntryReport {
                line_number,
                url: url.to_string(),
                outcome,
            });
        }

        let notice = if report.failed() > 0 {
            Notice::Warning
        } else {
            Notice::Success
        };
        self.presenter.notify(notice, &report.summary());
        Ok(report)
    }

    fn process_entry(&self, url: &str) -> EntryOutcome {
        let asset = match RepositoryReference::parse(url).and_then(|repository| {
            release::resolve_latest_asset(self.releases, &repository, PACKAGE_EXTENSION)
        }) {
            Ok(asset) => asset,
            Err(ApkError::NoMatchingAsset { .. }) => {
                let message = format!("No APK found in the latest release of {url}. Skipping...");
                self.presenter.notify(Notice::Warning, &message);
                return EntryOutcome::Skipped(message);
            }
            Err(e) => {
                let message = format!("Failed to fetch release for {url}: {e}. Skipping...");
                self.presenter.notify(Notice::Warning, &message);
                return EntryOutcome::Skipped(message);
            }
        };

        let installed = file_name_of(&asset.name)
            .ok_or_else(|| ApkError::invalid_input(&asset.name, "asset has no file name"))
            .and_then(|name| self.package_path(name))
            .and_then(|destination| {
                self.presenter
                    .notify(Notice::Info, &format!("Downloading {}...", asset.name));
                self.download(&asset.download_url, &destination)?;
                self.install_package(&destination)
            });

        match installed {
            Ok(Outcome::Installed(_)) => EntryOutcome::Installed,
            Ok(Outcome::Failed(result)) => {
                EntryOutcome::InstallFailed(result.failure_detail().to_string())
            }
            Ok(Outcome::Cancelled) => EntryOutcome::Skipped("cancelled".to_string()),
            Err(e) => {
                let message = format!("Failed to install {}: {e}", asset.name);
                self.presenter.notify(Notice::Error, &message);
                EntryOutcome::Failed(message)
            }
        }
    }

    /// Pick a bundle file from the base directory.
    ///
    /// A single bundle is used directly; several are offered in a menu.
    /// Returns `None` when there is none or the user backs out.
    pub fn choose_bundle_file(&self) -> Result<Option<PathBuf>> {
        let mut bundles = find_bundle_files(&self.settings.base_dir)?;
        match bundles.len() {
            0 => {
                self.presenter
                    .notify(Notice::Warning, "No Package-Bundle files found.");
                Ok(None)
            }
            1 => Ok(bundles.pop()),
            _ => {
                let names: Vec<String> = bundles
                    .iter()
                    .map(|path| {
                        path.file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_default()
                    })
                    .collect();
                let options: Vec<&str> = names.iter().map(String::as_str).collect();
                let choice = self
                    .presenter
                    .show_menu("Select a package bundle", &options)?;
                Ok(choice.and_then(|index| bundles.get(index).cloned()))
            }
        }
    }
}
