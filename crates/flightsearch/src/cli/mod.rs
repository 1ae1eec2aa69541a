//! Command-line interface for flightsearch.
//!
//! This module provides the CLI structure and command handlers for the
//! `fsearch` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DestinationsCommand, FavoritesCommand, ImportCommand, OutputFormat,
    SearchCommand, StatusCommand,
};

/// fsearch - Offline airport search and favorite routes
///
/// Searches a bundled airport dataset by name or IATA code, lists the
/// destinations reachable from an airport ranked by passenger volume, and
/// manages favorited routes. Everything runs against a local database; no
/// network access is required.
#[derive(Debug, Parser)]
#[command(name = "fsearch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search airports by name or IATA code
    Search(SearchCommand),

    /// List destinations reachable from an airport
    Destinations(DestinationsCommand),

    /// Manage favorite routes
    #[command(subcommand)]
    Favorites(FavoritesCommand),

    /// Import an airport dataset from a JSON file
    Import(ImportCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "fsearch");
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: true,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose() {
        let cli = Cli {
            config: None,
            verbose: 1,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_trace() {
        let cli = Cli {
            config: None,
            verbose: 2,
            quiet: false,
            command: Command::Status(StatusCommand { json: false }),
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_search() {
        let args = vec!["fsearch", "search", "FC"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Search(cmd) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(cmd.term, "FC");
        assert_eq!(cmd.format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_destinations() {
        let args = vec!["fsearch", "destinations", "Rome Fiumicino"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Destinations(cmd) = cli.command else {
            panic!("expected destinations command");
        };
        assert_eq!(cmd.airport, "Rome Fiumicino");
    }

    #[test]
    fn test_parse_favorites_toggle() {
        let args = vec!["fsearch", "favorites", "toggle", "FCO", "CPH"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Favorites(FavoritesCommand::Toggle { .. })
        ));
    }

    #[test]
    fn test_parse_favorites_list_json() {
        let args = vec!["fsearch", "favorites", "list", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Favorites(FavoritesCommand::List { json: true })
        ));
    }

    #[test]
    fn test_parse_import() {
        let args = vec!["fsearch", "import", "airports.json"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Import(cmd) = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(cmd.file, PathBuf::from("airports.json"));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["fsearch", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let args = vec!["fsearch", "-v", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["fsearch", "-q", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_config_validate() {
        let args = vec!["fsearch", "config", "validate", "-f", "my.toml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate {
                file: Some(_)
            })
        ));
    }
}
