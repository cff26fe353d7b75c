//! Shell completions command

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::{ApkError, Result};

const BIN_NAME: &str = "apksetup";

/// Resolve a shell name, case-insensitively; `pwsh` is accepted for PowerShell.
fn parse_shell(name: &str) -> Result<Shell> {
    let normalized = name.trim().to_ascii_lowercase();
    let canonical = if normalized == "pwsh" {
        "powershell"
    } else {
        normalized.as_str()
    };
    canonical.parse::<Shell>().map_err(|_| {
        ApkError::invalid_input(name, "supported shells: bash, elvish, fish, powershell, zsh")
    })
}

/// Write completions for the requested shell to stdout
pub fn run(args: CompletionsArgs) -> Result<()> {
    let shell = parse_shell(&args.shell)?;
    log::debug!("Generating {shell} completions");

    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut std::io::stdout().lock());
    Ok(())
}
