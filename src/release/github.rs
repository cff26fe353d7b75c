//! GitHub release API

use reqwest::StatusCode;
use reqwest::blocking::Client;

use super::{Release, ReleaseSource, RepositoryReference};
use crate::error::{ApkError, Result};

/// [`ReleaseSource`] backed by the GitHub REST API
pub struct GithubReleases {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl GithubReleases {
    pub fn new(client: Client, api_base: &str, token: Option<String>) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn latest_release_url(&self, repository: &RepositoryReference) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, repository.owner, repository.repo
        )
    }
}

impl ReleaseSource for GithubReleases {
    fn latest_release(&self, repository: &RepositoryReference) -> Result<Release> {
        let url = self.latest_release_url(repository);
        log::debug!("Fetching release metadata from {url}");

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| ApkError::Network {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApkError::NotFound {
                resource: format!("latest release of {repository}"),
            });
        }
        if !status.is_success() {
            return Err(ApkError::NotFound {
                resource: format!("latest release of {repository} (HTTP {status})"),
            });
        }

        let body = response.text().map_err(|e| ApkError::Network {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        let release: Release = serde_json::from_str(&body)?;
        Ok(release)
    }
}
