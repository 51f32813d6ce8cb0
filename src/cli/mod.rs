use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dotnet-helper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (defaults to the user config directory)
    #[arg(long, global = true, env = "DOTNET_HELPER_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Restore the dependencies of a .NET project
    Restore {
        /// Path to the project directory
        #[arg(value_name = "DIRECTORY")]
        path: Option<PathBuf>,

        /// Pass --verbosity minimal to the SDK
        #[arg(short, long)]
        quiet: bool,

        /// Run the SDK through the OS shell
        #[arg(long)]
        shell: bool,
    },

    /// Publish a .NET project into an output directory
    Publish {
        /// Path to the project directory
        #[arg(value_name = "DIRECTORY")]
        path: Option<PathBuf>,

        /// Directory receiving the published application
        #[arg(short, long)]
        output: PathBuf,

        /// Target framework moniker (e.g., net6.0)
        /// Uses the configured default when not specified
        #[arg(short, long)]
        framework: Option<String>,

        /// Run the SDK through the OS shell
        #[arg(long)]
        shell: bool,
    },

    /// Run the SDK with arbitrary arguments
    Exec {
        /// Working directory for the SDK
        #[arg(long, value_name = "DIRECTORY")]
        dir: Option<PathBuf>,

        /// Arguments passed to the SDK, joined into one argument string.
        /// Arguments with spaces are quoted for the platform shell; on Windows
        /// they may not contain double quotes
        #[arg(last = true, required = true)]
        args: Vec<String>,
    },

    /// Show which SDK executable would be used
    Locate,

    /// Show version information
    Version,
}
