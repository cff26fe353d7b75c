//! Bundle command implementation

use super::Components;
use crate::cli::BundleArgs;
use crate::config::Settings;
use crate::error::Result;

/// Install every repository listed in a bundle file
///
/// Without an explicit file the bundle files in the base directory are
/// offered. Per-line failures are reported but never fail the command.
pub fn run(settings: Settings, args: BundleArgs) -> Result<()> {
    let components = Components::new(settings, false)?;
    let pipeline = components.pipeline();

    let bundle_file = match args.file {
        Some(file) if file.is_absolute() => file,
        Some(file) => components.settings.base_dir.join(file),
        None => match pipeline.choose_bundle_file()? {
            Some(file) => file,
            None => return Ok(()),
        },
    };

    log::info!("Processing bundle {}", bundle_file.display());
    let report = pipeline.run_bundle(&bundle_file)?;

    for entry in &report.entries {
        if let Some(reason) = entry.outcome.reason() {
            log::info!("Line {} ({}): {reason}", entry.line_number, entry.url);
        }
    }
    Ok(())
}
