//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// The search term (matches airport names and IATA codes)
    pub term: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Destinations command arguments.
#[derive(Debug, Args)]
pub struct DestinationsCommand {
    /// Airport to depart from (name or IATA code)
    pub airport: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Favorite route management commands.
#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List favorited routes
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Favorite a route
    Add {
        /// IATA code of the departure airport
        departure: String,
        /// IATA code of the destination airport
        destination: String,
    },

    /// Un-favorite a route
    Remove {
        /// IATA code of the departure airport
        departure: String,
        /// IATA code of the destination airport
        destination: String,
    },

    /// Toggle the favorite flag on a route
    Toggle {
        /// IATA code of the departure airport
        departure: String,
        /// IATA code of the destination airport
        destination: String,
    },
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Path to a JSON airport dataset
    pub file: PathBuf,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
