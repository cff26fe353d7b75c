//! Latest-release resolution
//!
//! A [`ReleaseSource`] returns the latest release of a repository; the first
//! asset whose name ends with the required extension is the one installed.
//! Assets are scanned in the order the source lists them.

mod github;
mod reference;

pub use github::GithubReleases;
pub use reference::RepositoryReference;

use serde::Deserialize;

use crate::error::{ApkError, Result};

/// Downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

/// A published release and its assets
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Source of release metadata
pub trait ReleaseSource {
    /// Fetch the latest release of `repository`.
    ///
    /// Fails with [`ApkError::NotFound`] when the repository or release does not exist.
    fn latest_release(&self, repository: &RepositoryReference) -> Result<Release>;
}

/// First asset whose name ends with `extension` (case-sensitive)
pub fn select_asset<'a>(assets: &'a [ReleaseAsset], extension: &str) -> Option<&'a ReleaseAsset> {
    assets.iter().find(|asset| asset.name.ends_with(extension))
}

/// Resolve the installable asset of the latest release of `repository`.
pub fn resolve_latest_asset(
    source: &dyn ReleaseSource,
    repository: &RepositoryReference,
    extension: &str,
) -> Result<ReleaseAsset> {
    let release = source.latest_release(repository)?;
    log::debug!(
        "Latest release of {repository}: {} with {} assets",
        release.tag_name.as_deref().unwrap_or("<untagged>"),
        release.assets.len()
    );

    select_asset(&release.assets, extension)
        .cloned()
        .ok_or_else(|| ApkError::NoMatchingAsset {
            repository: repository.to_string(),
            extension: extension.to_string(),
        })
}
