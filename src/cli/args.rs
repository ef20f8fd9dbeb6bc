//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand, ValueEnum};

/// Budget API - personal budgeting backend
#[derive(Parser, Debug)]
#[command(name = "budget-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (extension optional, defaults to config/config)
    #[arg(short, long, global = true, env = "CONFIG_PATH")]
    pub config: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty, env = "LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output
    Pretty,
    /// One JSON object per line
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),
}

/// Arguments for the serve command. Unset values fall back to the config file.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Apply pending migrations
    Up {
        /// Apply at most this many (default: all)
        #[arg(long)]
        steps: Option<u32>,
    },
    /// Revert the most recent migrations
    Down {
        /// Number of migrations to revert
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// List migrations and whether each is applied
    Status,
    /// Drop all users and transactions, then rebuild the schema
    Fresh {
        /// Confirm that existing data may be destroyed
        #[arg(long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["budget-api", "serve", "--port", "9000"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert!(args.host.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["budget-api", "migrate", "status", "--verbose", "--log-format", "json"]);
        assert!(cli.verbose);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Status
            })
        ));
    }

    #[test]
    fn test_migrate_defaults() {
        let cli = Cli::parse_from(["budget-api", "migrate", "down"]);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Down { steps: 1 }
            })
        ));

        let cli = Cli::parse_from(["budget-api", "migrate", "fresh"]);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Fresh { yes: false }
            })
        ));
    }
}
