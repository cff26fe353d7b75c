//! Platform tool invocation
//!
//! Wraps the two platform tool commands the installer needs: `devices` and
//! `install -r <package>`. The tool's location is checked on every call, so a
//! tools directory removed between calls is reported instead of surfacing as
//! a spawn failure.

use std::ffi::OsStr;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{ApkError, Result};

/// Header line printed by the `devices` command
const DEVICE_LIST_HEADER: &str = "List of devices attached";

/// Token the install command prints on success
const SUCCESS_TOKEN: &str = "Success";

/// Connection state reported for a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    /// Connected and authorized
    Device,
    Unauthorized,
    Offline,
    Other(String),
}

impl DeviceState {
    fn parse(raw: &str) -> Self {
        match raw {
            "device" => DeviceState::Device,
            "unauthorized" => DeviceState::Unauthorized,
            "offline" => DeviceState::Offline,
            other => DeviceState::Other(other.to_string()),
        }
    }
}

/// Serial number identifying a device
pub type DeviceId = String;

/// One row of the device listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub serial: DeviceId,
    pub state: DeviceState,
}

impl Device {
    /// Whether packages can be installed on this device
    pub fn is_ready(&self) -> bool {
        self.state == DeviceState::Device
    }
}

/// Parse the tabular output of `devices`.
///
/// Daemon start-up chatter (`* daemon started successfully`) and the header
/// line are ignored.
pub fn parse_devices(stdout: &str) -> Vec<Device> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with(DEVICE_LIST_HEADER) && !line.starts_with('*'))
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let serial = columns.next()?;
            let state = columns.next()?;
            Some(Device {
                serial: serial.to_string(),
                state: DeviceState::parse(state),
            })
        })
        .collect()
}

/// Outcome of a single install attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub succeeded: bool,
    /// Captured standard output
    pub raw_output: String,
    /// Captured standard error
    pub error_output: String,
}

impl InstallResult {
    /// Build a result from captured output.
    ///
    /// Success requires both a zero exit status and the success token on stdout.
    pub fn from_output(stdout: &str, stderr: &str, exit_success: bool) -> Self {
        Self {
            succeeded: exit_success && stdout.contains(SUCCESS_TOKEN),
            raw_output: stdout.to_string(),
            error_output: stderr.to_string(),
        }
    }

    /// Most useful diagnostic text for a failed install
    pub fn failure_detail(&self) -> &str {
        let stderr = self.error_output.trim();
        if stderr.is_empty() {
            self.raw_output.trim()
        } else {
            stderr
        }
    }
}

/// Enumerates devices and installs packages on them
pub trait PackageInstaller {
    /// List attached devices; empty when none are reported
    fn list_devices(&self) -> Result<Vec<Device>>;

    /// Install (or replace) the package at `package`
    fn install(&self, package: &Path) -> Result<InstallResult>;
}

/// [`PackageInstaller`] that shells out to the platform tool
pub struct Adb {
    tool_path: PathBuf,
}

impl Adb {
    pub fn new(tool_path: PathBuf) -> Self {
        Self { tool_path }
    }

    fn run(&self, args: &[&OsStr]) -> Result<Output> {
        if !self.tool_path.is_file() {
            return Err(ApkError::ToolNotFound {
                path: self.tool_path.display().to_string(),
            });
        }

        log::debug!("Running {} {:?}", self.tool_path.display(), args);
        let output = Command::new(&self.tool_path)
            .args(args)
            .output()
            .map_err(|e| ApkError::io("Failed to run", &self.tool_path, &e))?;
        log::debug!("{} exited with {}", self.tool_path.display(), output.status);
        Ok(output)
    }
}

impl PackageInstaller for Adb {
    fn list_devices(&self) -> Result<Vec<Device>> {
        let output = self.run(&[OsStr::new("devices")])?;
        let devices = parse_devices(&String::from_utf8_lossy(&output.stdout));
        log::debug!("Found {} device(s)", devices.len());
        Ok(devices)
    }

    fn install(&self, package: &Path) -> Result<InstallResult> {
        // Held open while the tool reads the package
        let _package_file = File::open(package).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ApkError::FileNotFound {
                path: package.display().to_string(),
            },
            _ => ApkError::io("Failed to open", package, &e),
        })?;

        let output = self.run(&[OsStr::new("install"), OsStr::new("-r"), package.as_os_str()])?;
        Ok(InstallResult::from_output(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
            output.status.success(),
        ))
    }
}
