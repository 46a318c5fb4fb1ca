//! CLI argument definitions using clap derive

use crate::resource::ResourceKind;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rubick - container hosts from the terminal
///
/// Lists hosts registered on a Rubick backend and browses their containers,
/// images, volumes, networks and compose projects.
#[derive(Parser, Debug)]
#[command(name = "rubick")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "RUBICK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend API base URL (overrides api.base_url)
    #[arg(long, global = true, env = "RUBICK_API_URL")]
    pub api_url: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the backend is reachable
    Status,

    /// List registered hosts
    Hosts(HostsArgs),

    /// Set the host other commands act on
    Use(UseArgs),

    /// Show a host's resources
    Resources(ResourcesArgs),

    /// Browse hosts and resources interactively
    Browse,

    /// Start, stop, restart or remove a container
    Container(ContainerArgs),

    /// Check that the backend can reach a host
    Test(TestArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the hosts command
#[derive(Parser, Debug)]
pub struct HostsArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the use command
#[derive(Parser, Debug)]
pub struct UseArgs {
    /// Host id or name (prompts when omitted)
    pub host: Option<String>,
}

/// Arguments for the resources command
#[derive(Parser, Debug)]
pub struct ResourcesArgs {
    /// Host id or name (defaults to the current host)
    #[arg(conflicts_with = "all_hosts")]
    pub host: Option<String>,

    /// Only show one kind: containers, images, volumes, networks, compose
    #[arg(short, long)]
    pub kind: Option<ResourceKind>,

    /// Fetch again even if the listing is cached
    #[arg(short, long)]
    pub refresh: bool,

    /// Load every registered host
    #[arg(short, long)]
    pub all_hosts: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the container command
#[derive(Parser, Debug)]
pub struct ContainerArgs {
    #[command(subcommand)]
    pub action: ContainerCommand,
}

/// Container subcommands
#[derive(Subcommand, Debug)]
pub enum ContainerCommand {
    /// Start a stopped container
    Start(ContainerTarget),

    /// Stop a running container
    Stop {
        #[command(flatten)]
        target: ContainerTarget,

        /// Seconds to wait before killing it
        #[arg(short, long)]
        timeout: Option<u32>,
    },

    /// Restart a container
    Restart {
        #[command(flatten)]
        target: ContainerTarget,

        /// Seconds to wait before killing it
        #[arg(short, long)]
        timeout: Option<u32>,
    },

    /// Remove a container
    Remove {
        #[command(flatten)]
        target: ContainerTarget,

        /// Remove even if it is running
        #[arg(short, long)]
        force: bool,

        /// Also remove its anonymous volumes
        #[arg(long)]
        volumes: bool,
    },

    /// Show CPU, memory and I/O usage
    Stats(ContainerTarget),
}

impl ContainerCommand {
    pub fn target(&self) -> &ContainerTarget {
        match self {
            Self::Start(target) | Self::Stats(target) => target,
            Self::Stop { target, .. }
            | Self::Restart { target, .. }
            | Self::Remove { target, .. } => target,
        }
    }
}

/// Which container on which host
#[derive(Parser, Debug, Clone)]
pub struct ContainerTarget {
    /// Container id, id prefix or name
    pub container: String,

    /// Host id or name (defaults to the current host)
    #[arg(short = 'H', long)]
    pub host: Option<String>,
}

/// Arguments for the test command
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Host id or name (defaults to the current host)
    pub host: Option<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_status() {
        let cli = Cli::parse_from(["rubick", "status"]);
        assert!(matches!(cli.command, Commands::Status));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "rubick",
            "hosts",
            "-vv",
            "--api-url",
            "http://backend:8080/api/v1",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.api_url.as_deref(), Some("http://backend:8080/api/v1"));
    }

    #[test]
    fn cli_parses_hosts_format() {
        let cli = Cli::parse_from(["rubick", "hosts", "--format", "json"]);
        match cli.command {
            Commands::Hosts(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("expected Hosts command"),
        }
    }

    #[test]
    fn cli_parses_use_without_host() {
        let cli = Cli::parse_from(["rubick", "use"]);
        match cli.command {
            Commands::Use(args) => assert!(args.host.is_none()),
            _ => panic!("expected Use command"),
        }
    }

    #[test]
    fn cli_parses_resources() {
        let cli = Cli::parse_from(["rubick", "resources", "edge", "--kind", "images", "--refresh"]);
        match cli.command {
            Commands::Resources(args) => {
                assert_eq!(args.host.as_deref(), Some("edge"));
                assert_eq!(args.kind, Some(ResourceKind::Image));
                assert!(args.refresh);
                assert!(!args.all_hosts);
                assert_eq!(args.format, OutputFormat::Table);
            }
            _ => panic!("expected Resources command"),
        }
    }

    #[test]
    fn resources_rejects_unknown_kind() {
        let result = Cli::try_parse_from(["rubick", "resources", "--kind", "pods"]);
        assert!(result.is_err());
    }

    #[test]
    fn resources_host_conflicts_with_all_hosts() {
        let result = Cli::try_parse_from(["rubick", "resources", "edge", "--all-hosts"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_container_stop_with_timeout() {
        let cli = Cli::parse_from(["rubick", "container", "stop", "web", "-H", "edge", "-t", "5"]);
        match cli.command {
            Commands::Container(args) => {
                assert_eq!(args.action.target().container, "web");
                assert_eq!(args.action.target().host.as_deref(), Some("edge"));
                assert!(matches!(args.action, ContainerCommand::Stop { timeout: Some(5), .. }));
            }
            _ => panic!("expected Container command"),
        }
    }

    #[test]
    fn cli_parses_container_remove_flags() {
        let cli = Cli::parse_from(["rubick", "container", "remove", "web", "--force", "--volumes"]);
        match cli.command {
            Commands::Container(args) => assert!(matches!(
                args.action,
                ContainerCommand::Remove {
                    force: true,
                    volumes: true,
                    ..
                }
            )),
            _ => panic!("expected Container command"),
        }
    }

    #[test]
    fn container_requires_a_target() {
        assert!(Cli::try_parse_from(["rubick", "container", "start"]).is_err());
    }

    #[test]
    fn cli_parses_test_host() {
        let cli = Cli::parse_from(["rubick", "test", "edge"]);
        match cli.command {
            Commands::Test(args) => assert_eq!(args.host.as_deref(), Some("edge")),
            _ => panic!("expected Test command"),
        }
    }

    #[test]
    fn cli_parses_config_init_force() {
        let cli = Cli::parse_from(["rubick", "config", "init", "--force"]);
        match cli.command {
            Commands::Config(args) => {
                assert!(matches!(args.action, Some(ConfigAction::Init { force: true })))
            }
            _ => panic!("expected Config command"),
        }
    }
}
