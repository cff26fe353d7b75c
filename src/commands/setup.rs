//! Setup command implementation

use super::Components;
use crate::config::Settings;
use crate::error::Result;

/// Download and extract the platform tools unless already installed
pub fn run(settings: Settings) -> Result<()> {
    let components = Components::new(settings, false)?;
    components.pipeline().setup_platform_tools()?;
    Ok(())
}
