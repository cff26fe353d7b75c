//! Error types and handling for apksetup
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostic codes and help text.
//!
//! Variants are grouped by the pipeline stage that raises them:
//! - network: transfers and release metadata requests
//! - release: repository references and asset selection
//! - archive: platform-tools extraction
//! - device: platform tool invocation
//! - input: user supplied URLs and file names
//! - fs: local file system access

use miette::Diagnostic;
use thiserror::Error;


/// Main error type for apksetup operations
#[derive(Error, Diagnostic, Debug)]
pub enum ApkError {
    // Network errors
    #[error("Request to {url} failed: {reason}")]
    #[diagnostic(
        code(apksetup::network::request_failed),
        help("Check your network connection and try the same option again")
    )]
    Network { url: String, reason: String },

    // Release errors
    #[error("Not found: {resource}")]
    #[diagnostic(
        code(apksetup::release::not_found),
        help("Check that the repository exists and has a published release")
    )]
    NotFound { resource: String },

    #[error("No {extension} asset in the latest release of {repository}")]
    #[diagnostic(code(apksetup::release::no_matching_asset))]
    NoMatchingAsset {
        repository: String,
        extension: String,
    },

    #[error("Failed to parse {what}: {reason}")]
    #[diagnostic(code(apksetup::release::parse_failed))]
    ParseFailed { what: String, reason: String },

    // Archive errors
    #[error("Failed to extract {path}: {reason}")]
    #[diagnostic(
        code(apksetup::archive::extraction_failed),
        help("Delete the platform-tools directory and run setup again")
    )]
    Extraction { path: String, reason: String },

    // Device errors
    #[error("Platform tool not found at {path}")]
    #[diagnostic(
        code(apksetup::device::tool_not_found),
        help("Run 'apksetup setup' or answer Yes when asked to install ADB")
    )]
    ToolNotFound { path: String },

    #[error("No device connected")]
    #[diagnostic(
        code(apksetup::device::no_device),
        help("Connect an Android device with USB debugging enabled and accept the authorization prompt")
    )]
    NoDeviceConnected,

    #[error("Failed to install {package}")]
    #[diagnostic(code(apksetup::device::install_failed))]
    InstallFailed { package: String },

    // Input errors
    #[error("Invalid input '{input}': {reason}")]
    #[diagnostic(code(apksetup::input::invalid))]
    InvalidInput { input: String, reason: String },

    #[error("Prompt failed: {message}")]
    #[diagnostic(code(apksetup::input::prompt_failed))]
    PromptFailed { message: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(apksetup::fs::not_found))]
    FileNotFound { path: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(apksetup::fs::io_error))]
    IoError { message: String },
}

impl ApkError {
    /// Creates an invalid input error
    pub fn invalid_input(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ApkError::InvalidInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an IO error with the operation and path that failed
    pub fn io(operation: &str, path: &std::path::Path, err: &std::io::Error) -> Self {
        ApkError::IoError {
            message: format!("{operation} {}: {err}", path.display()),
        }
    }

    /// Creates an extraction error for an archive path
    pub fn extraction(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        ApkError::Extraction {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for ApkError {
    fn from(err: std::io::Error) -> Self {
        ApkError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApkError {
    fn from(err: serde_json::Error) -> Self {
        ApkError::ParseFailed {
            what: "release metadata".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApkError {
    fn from(err: reqwest::Error) -> Self {
        ApkError::Network {
            url: err
                .url()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown".to_string()),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for ApkError {
    fn from(err: inquire::InquireError) -> Self {
        ApkError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ApkError>;
