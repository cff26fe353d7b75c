//! Runtime settings and well-known paths
//!
//! All paths the pipeline touches are derived from a single base directory,
//! which defaults to the current working directory.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{ApkError, Result};

/// Directory the platform-tools archive is extracted into
pub const TOOLS_DIR: &str = "platform-tools";

/// Directory the archive nests its payload under
pub const NESTED_TOOLS_DIR: &str = "platform-tools";

/// Directory downloaded packages are stored in
pub const PACKAGE_DIR: &str = "apk_setup_apks";

/// Marker a bundle file name must contain
pub const BUNDLE_MARKER: &str = "Package-Bundle";

/// Extension a bundle file name must end with
pub const BUNDLE_EXTENSION: &str = ".txt";

/// Extension of installable packages
pub const PACKAGE_EXTENSION: &str = ".apk";

/// Default release metadata API
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

#[cfg(windows)]
const TOOL_EXE: &str = "adb.exe";

#[cfg(not(windows))]
const TOOL_EXE: &str = "adb";

/// File name of the platform tool executable
pub fn tool_exe() -> &'static str {
    TOOL_EXE
}

/// Platform-tools archive for the host operating system
pub fn default_platform_tools_url() -> String {
    let os = match std::env::consts::OS {
        "windows" => "windows",
        "macos" => "darwin",
        _ => "linux",
    };
    format!("https://dl.google.com/android/repository/platform-tools-latest-{os}.zip")
}

/// Settings for a single run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base directory all other paths are relative to
    pub base_dir: PathBuf,
    /// Archive URL for the platform tools
    pub platform_tools_url: String,
    /// Base URL of the release metadata API
    pub github_api: String,
    /// Optional API token sent as bearer auth
    pub github_token: Option<String>,
}

impl Settings {
    /// Build settings from parsed command line arguments
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let base_dir = match &cli.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| ApkError::IoError {
                message: format!("Could not determine current directory: {e}"),
            })?,
        };

        Ok(Self {
            base_dir,
            platform_tools_url: cli
                .platform_tools_url
                .clone()
                .unwrap_or_else(default_platform_tools_url),
            github_api: cli.github_api.trim_end_matches('/').to_string(),
            github_token: cli.github_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Settings rooted at `base_dir` with default remote endpoints
    #[cfg(test)]
    pub fn for_base_dir(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            platform_tools_url: default_platform_tools_url(),
            github_api: DEFAULT_GITHUB_API.to_string(),
            github_token: None,
        }
    }

    /// Directory holding the extracted platform tools
    pub fn tools_dir(&self) -> PathBuf {
        self.base_dir.join(TOOLS_DIR)
    }

    /// Path of the platform tool executable
    pub fn tool_path(&self) -> PathBuf {
        self.tools_dir().join(TOOL_EXE)
    }

    /// Directory downloaded packages are written to
    pub fn package_dir(&self) -> PathBuf {
        self.base_dir.join(PACKAGE_DIR)
    }

    /// Resolve a user supplied package file name against the base directory
    pub fn local_package(&self, name: &str) -> PathBuf {
        resolve_relative(&self.base_dir, name)
    }
}

fn resolve_relative(base: &Path, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
