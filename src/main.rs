use anyhow::{Context, Result};
use clap::Parser;
use dotnet_helper::{
    cli::{Cli, Commands},
    config::Config,
    invoke::join_arguments,
    constants::DOTNET_APP_NAME,
    locate::{is_bare_command, DotnetLocator},
    DotnetHelper, InvocationOutcome,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    debug!("Using config: {:?}", config);

    let helper = DotnetHelper::from_config(DotnetLocator::new(), &config);

    match cli.command {
        Commands::Restore { path, quiet, shell } => {
            let project_path = path.unwrap_or_else(|| PathBuf::from("."));
            let outcome = helper.run_restore(&project_path, quiet, shell);
            check("restore", outcome)?;
        }
        Commands::Publish {
            path,
            output,
            framework,
            shell,
        } => {
            let project_path = path.unwrap_or_else(|| PathBuf::from("."));
            let framework = framework.unwrap_or_default();
            let outcome = helper.run_publish(&project_path, &output, &framework, shell);
            check("publish", outcome)?;
            info!("Published to {}", output.display());
        }
        Commands::Exec { dir, args } => {
            let working_dir = dir.unwrap_or_else(|| PathBuf::from("."));
            let argument = join_arguments(&args).context("Failed to build SDK arguments")?;
            let invocation = helper.build_start_info(&working_dir, &argument);
            let outcome = invocation.execute(config.publish_timeout());
            check("exec", outcome)?;
        }
        Commands::Locate => {
            let executable = helper.dotnet_executable();
            if is_bare_command(&executable) {
                match which::which(DOTNET_APP_NAME) {
                    Ok(found) => info!(
                        "No SDK install directory found; PATH resolves to {}",
                        found.display()
                    ),
                    Err(_) => warn!(
                        "No SDK install directory found and {} is not on PATH",
                        DOTNET_APP_NAME
                    ),
                }
            }
            // Print only the executable to stdout
            println!("{}", executable.display());
        }
        Commands::Version => {
            println!("dotnet-helper {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn check(operation: &str, outcome: InvocationOutcome) -> Result<()> {
    if outcome.success() {
        return Ok(());
    }
    anyhow::bail!("dotnet {} failed: {}", operation, outcome)
}
