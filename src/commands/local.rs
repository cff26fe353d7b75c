//! Local command implementation

use super::{Components, install_failed};
use crate::cli::LocalArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::pipeline::Outcome;

/// Install a package file from the base directory
pub fn run(settings: Settings, args: LocalArgs) -> Result<()> {
    let components = Components::new(settings, false)?;

    match components.pipeline().run_local_file(&args.file)? {
        Outcome::Installed(_) | Outcome::Cancelled => Ok(()),
        Outcome::Failed(result) => Err(install_failed(&args.file, &result)),
    }
}
