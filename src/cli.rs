//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_GITHUB_API;

/// apksetup - Android package installer
///
/// Download the Android platform tools and install APKs from GitHub releases,
/// local files or package bundles onto a connected device.
#[derive(Parser, Debug)]
#[command(
    name = "apksetup",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install Android packages over ADB",
    long_about = "apksetup downloads the Android platform tools, fetches APKs from GitHub \
                  releases or local files, and installs them on a connected device. \
                  Run without a command for the interactive menu.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  apksetup\n    \
                  apksetup setup\n    \
                  apksetup url https://github.com/owner/app/releases/download/v1.0/app.apk\n    \
                  apksetup local app-release.apk\n    \
                  apksetup bundle My-Package-Bundle.txt"
)]
pub struct Cli {
    /// Base directory for platform tools, downloads and bundle files (defaults to current directory)
    #[arg(long, short = 'd', global = true, env = "APKSETUP_DIR")]
    pub dir: Option<PathBuf>,

    /// Platform-tools archive URL (defaults to the archive for this OS)
    #[arg(long, global = true, env = "APKSETUP_PLATFORM_TOOLS_URL")]
    pub platform_tools_url: Option<String>,

    /// Release metadata API base URL
    #[arg(long, global = true, env = "APKSETUP_GITHUB_API", default_value = DEFAULT_GITHUB_API)]
    pub github_api: String,

    /// Token for the release metadata API
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive menu (default)
    Menu,

    /// Download and extract the Android platform tools
    Setup,

    /// Download an APK from a GitHub release URL and install it
    Url(UrlArgs),

    /// Install an APK file from the base directory
    Local(LocalArgs),

    /// Install the latest release APK of every repository in a bundle file
    Bundle(BundleArgs),

    /// List connected devices
    Devices,

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the url command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Download and confirm before installing:\n    \
                  apksetup url https://github.com/owner/app/releases/download/v1.0/app.apk\n\n\
                  Install without asking:\n    \
                  apksetup url https://github.com/owner/app/releases/download/v1.0/app.apk --yes")]
pub struct UrlArgs {
    /// GitHub download URL ending in .apk
    pub url: String,

    /// Install without confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the local command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install a file next to the tool:\n    apksetup local app-release.apk\n\n\
                  Install from another base directory:\n    apksetup -d ~/apks local app.apk")]
pub struct LocalArgs {
    /// APK file name (relative to the base directory)
    pub file: String,
}

/// Arguments for the bundle command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Pick from discovered bundle files:\n    apksetup bundle\n\n\
                  Use a specific bundle file:\n    apksetup bundle Work-Package-Bundle.txt")]
pub struct BundleArgs {
    /// Bundle file (defaults to discovered *Package-Bundle*.txt files)
    pub file: Option<PathBuf>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    apksetup completions --shell bash > ~/.bash_completion.d/apksetup\n\n\
                  Generate zsh completions:\n    apksetup completions --shell zsh > ~/.zfunc/_apksetup")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
