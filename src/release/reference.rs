//! Repository reference parsing
//!
//! Accepts the URLs users copy from a browser: `https://github.com/<owner>/<repo>`
//! optionally followed by any path (`/releases`, `/releases/tag/v1`, ...).

use std::fmt;

use crate::error::{ApkError, Result};

const GITHUB_PREFIXES: [&str; 2] = ["https://github.com/", "http://github.com/"];

/// Owner and name of a source repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    pub owner: String,
    pub repo: String,
}

impl RepositoryReference {
    /// Parse a reference from a repository URL.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let rest = GITHUB_PREFIXES
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))
            .ok_or_else(|| {
                ApkError::invalid_input(trimmed, "expected https://github.com/<owner>/<repo>")
            })?;

        // Drop query and fragment before splitting the path
        let path = rest.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/');
        let owner = segments.next().unwrap_or_default();
        let repo = segments.next().unwrap_or_default().trim_end_matches(".git");

        if owner.is_empty() || repo.is_empty() {
            return Err(ApkError::invalid_input(
                trimmed,
                "repository owner and name must both be present",
            ));
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
