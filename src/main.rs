//! Rubick CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use rubick::cli::{Cli, Commands};
use rubick::config::{Config, ConfigFile, LogFormat};
use rubick::error::RubickResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> RubickResult<()> {
    let cli = Cli::parse();

    let config_file = ConfigFile::locate(cli.config.clone());
    let mut config = config_file.read().await?;

    init_logging(cli.verbose, &config);

    if let Some(url) = cli.api_url {
        debug!("Using backend {} from --api-url", url);
        config.api.base_url = url;
    }

    // Config commands must work before any state exists
    if !matches!(cli.command, Commands::Config(_)) {
        rubick::config::ensure_state_dir().await?;
    }

    match cli.command {
        Commands::Status => rubick::cli::commands::status(&config).await,
        Commands::Hosts(args) => rubick::cli::commands::hosts(args, &config).await,
        Commands::Use(args) => rubick::cli::commands::use_host(args, &config).await,
        Commands::Resources(args) => rubick::cli::commands::resources(args, &config).await,
        Commands::Browse => rubick::cli::commands::browse(&config).await,
        Commands::Container(args) => rubick::cli::commands::container(args, &config).await,
        Commands::Test(args) => rubick::cli::commands::test_host(args, &config).await,
        Commands::Config(args) => {
            rubick::cli::commands::config(args, &config, &config_file).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug; `RUST_LOG` wins when set
fn init_logging(verbose: u8, config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("rubick=warn"),
        1 => EnvFilter::new("rubick=info"),
        _ => EnvFilter::new("rubick=debug"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.general.log_format == LogFormat::Json {
        builder.json().init();
    } else {
        builder.with_target(false).without_time().init();
    }
}
