//! Devices command implementation

use console::Style;

use crate::config::Settings;
use crate::device::{Adb, Device, DeviceState, PackageInstaller};
use crate::error::Result;

/// List devices reported by the platform tool
pub fn run(settings: &Settings) -> Result<()> {
    let devices = Adb::new(settings.tool_path()).list_devices()?;

    if devices.is_empty() {
        println!("No devices connected.");
        return Ok(());
    }

    for device in &devices {
        println!("{}", format_device(device));
    }
    Ok(())
}

fn state_label(state: &DeviceState) -> &str {
    match state {
        DeviceState::Device => "device",
        DeviceState::Unauthorized => "unauthorized",
        DeviceState::Offline => "offline",
        DeviceState::Other(raw) => raw,
    }
}

fn format_device(device: &Device) -> String {
    let style = if device.is_ready() {
        Style::new().green()
    } else {
        Style::new().yellow()
    };
    format!(
        "{}\t{}",
        Style::new().bold().apply_to(&device.serial),
        style.apply_to(state_label(&device.state))
    )
}
