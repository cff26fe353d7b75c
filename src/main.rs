//! apksetup - Android package installer
//!
//! Downloads the Android platform tools, fetches APKs from GitHub releases or
//! local files and installs them on a connected device over ADB.

use clap::Parser;
use miette::Diagnostic;

mod archive;
mod cli;
mod commands;
mod config;
mod device;
mod error;
mod http;
mod pipeline;
mod release;
mod temp;
#[cfg(test)]
mod test_fixtures;
mod transfer;
mod ui;

use cli::{Cli, Commands};
use config::Settings;
use error::Result;

/// Initialise logging; `RUST_LOG` takes precedence over `--verbose`
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Version) => return commands::version::run(),
        Some(Commands::Completions(args)) => return commands::completions::run(args),
        _ => {}
    }

    let settings = Settings::from_cli(&cli)?;
    log::debug!("Base directory: {}", settings.base_dir.display());

    match cli.command {
        None | Some(Commands::Menu) => commands::menu::run(settings),
        Some(Commands::Setup) => commands::setup::run(settings),
        Some(Commands::Url(args)) => commands::url::run(settings, args),
        Some(Commands::Local(args)) => commands::local::run(settings, args),
        Some(Commands::Bundle(args)) => commands::bundle::run(settings, args),
        Some(Commands::Devices) => commands::devices::run(&settings),
        Some(Commands::Version | Commands::Completions(_)) => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        if let Some(help) = e.help() {
            eprintln!("Help: {help}");
        }
        std::process::exit(1);
    }
}
