//! Url command implementation

use super::{Components, install_failed};
use crate::cli::UrlArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::pipeline::Outcome;

/// Download a package from a release URL and install it
pub fn run(settings: Settings, args: UrlArgs) -> Result<()> {
    let components = Components::new(settings, args.yes)?;

    match components.pipeline().run_single_url(&args.url)? {
        Outcome::Installed(_) | Outcome::Cancelled => Ok(()),
        Outcome::Failed(result) => Err(install_failed(&args.url, &result)),
    }
}
