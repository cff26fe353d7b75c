//! Command implementations for apksetup CLI

pub mod bundle;
pub mod completions;
pub mod devices;
pub mod local;
pub mod menu;
pub mod setup;
pub mod url;
pub mod version;

use crate::config::Settings;
use crate::device::{Adb, InstallResult};
use crate::error::{ApkError, Result};
use crate::http;
use crate::pipeline::Pipeline;
use crate::release::GithubReleases;
use crate::transfer::HttpDownloader;
use crate::ui::TerminalPresenter;

/// Production collaborators for a pipeline run
pub struct Components {
    pub settings: Settings,
    downloader: HttpDownloader,
    releases: GithubReleases,
    installer: Adb,
    presenter: TerminalPresenter,
}

impl Components {
    /// Build the HTTP, release, device and terminal components for `settings`.
    pub fn new(settings: Settings, assume_yes: bool) -> Result<Self> {
        let client = http::client()?;
        Ok(Self {
            downloader: HttpDownloader::new(client.clone()),
            releases: GithubReleases::new(
                client,
                &settings.github_api,
                settings.github_token.clone(),
            ),
            installer: Adb::new(settings.tool_path()),
            presenter: TerminalPresenter::new(assume_yes),
            settings,
        })
    }

    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline {
            settings: &self.settings,
            downloader: &self.downloader,
            releases: &self.releases,
            installer: &self.installer,
            presenter: &self.presenter,
        }
    }
}

/// Error for an install command that ran and reported failure
fn install_failed(package: &str, result: &InstallResult) -> ApkError {
    log::debug!(
        "Install output for {package}:\n{}\n{}",
        result.raw_output,
        result.error_output
    );
    ApkError::InstallFailed {
        package: package.to_string(),
    }
}
