//! `fsearch` - CLI for flightsearch
//!
//! This binary provides the command-line interface for searching airports,
//! listing destinations, and managing favorite routes.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;

use flightsearch::cli::{
    Cli, Command, ConfigCommand, DestinationsCommand, FavoritesCommand, ImportCommand,
    OutputFormat, SearchCommand, StatusCommand,
};
use flightsearch::{
    init_logging, Airport, Config, FlightDetail, Session, SessionHandle, Storage, ViewState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Search(cmd) => handle_search(&config, &cmd).await,
        Command::Destinations(cmd) => handle_destinations(&config, &cmd).await,
        Command::Favorites(cmd) => handle_favorites(&config, cmd).await,
        Command::Import(cmd) => handle_import(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Open the configured database.
fn open_storage(config: &Config) -> anyhow::Result<Storage> {
    Storage::open(config.database_path()).context("failed to open flight database")
}

/// Run a live search through a session and print the results.
async fn handle_search(config: &Config, cmd: &SearchCommand) -> anyhow::Result<()> {
    if cmd.term.trim().is_empty() {
        bail!("search term is empty");
    }

    let storage = open_storage(config)?;
    let (handle, _status) = Session::spawn(storage, config.debounce());
    let mut state = handle.state();

    handle.update_search_text(cmd.term.clone()).await?;

    // The session publishes an empty search view immediately, then the
    // debounced query result. An empty result publishes an identical view,
    // so cap the wait for the second publish.
    state
        .wait_for(|view| matches!(view, ViewState::Search(_)))
        .await?;
    let deadline = config.debounce() * 2 + Duration::from_millis(100);
    let _ = tokio::time::timeout(deadline, state.changed()).await;

    let ViewState::Search(hits) = state.borrow().clone() else {
        bail!("session left the search view unexpectedly");
    };

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hits)?),
        OutputFormat::Plain => {
            if hits.is_empty() {
                println!("No airports match \"{}\".", cmd.term);
            } else {
                for hit in &hits {
                    println!("{hit}");
                }
            }
        }
    }

    shutdown(&handle).await;
    Ok(())
}

/// List destinations reachable from an airport, with favorite markers.
async fn handle_destinations(config: &Config, cmd: &DestinationsCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;

    // Resolve the argument to a concrete airport before handing the
    // storage to the session.
    let hits = storage.search_airports(&cmd.airport)?;
    let Some(origin) = hits.into_iter().next() else {
        return Err(flightsearch::Error::airport_not_found(cmd.airport.as_str()).into());
    };

    let (handle, _status) = Session::spawn(storage, config.debounce());
    let mut state = handle.state();

    handle.select_search_result(origin.clone()).await?;
    let view = state
        .wait_for(|view| matches!(view, ViewState::Destinations { .. }))
        .await?
        .clone();
    let ViewState::Destinations { flights, .. } = view else {
        bail!("session left the destinations view unexpectedly");
    };

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&flights)?),
        OutputFormat::Plain => {
            println!("Destinations from {origin}:");
            for flight in &flights {
                let marker = if flight.is_favorite { "*" } else { " " };
                println!(
                    "{marker} {} ({})",
                    flight.arrival_name, flight.arrival_code
                );
            }
        }
    }

    shutdown(&handle).await;
    Ok(())
}

/// Manage favorite routes.
async fn handle_favorites(config: &Config, cmd: FavoritesCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;

    match cmd {
        FavoritesCommand::List { json } => {
            let routes = storage.favorites()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&routes)?);
            } else if routes.is_empty() {
                println!("No favorite routes.");
            } else {
                for route in &routes {
                    println!(
                        "{} -> {}  (added {})",
                        route.departure_code,
                        route.destination_code,
                        route.created_at.format("%Y-%m-%d")
                    );
                }
            }
        }
        FavoritesCommand::Add {
            departure,
            destination,
        } => {
            if storage.add_favorite(&departure, &destination)? {
                println!("Flight from {departure} to {destination} added to favorites!");
            } else {
                println!("Flight from {departure} to {destination} is already a favorite.");
            }
        }
        FavoritesCommand::Remove {
            departure,
            destination,
        } => {
            if storage.remove_favorite(&departure, &destination)? {
                println!("Flight from {departure} to {destination} removed from favorites.");
            } else {
                println!("Flight from {departure} to {destination} is not a favorite.");
            }
        }
        FavoritesCommand::Toggle {
            departure,
            destination,
        } => {
            return handle_toggle(config, storage, &departure, &destination).await;
        }
    }
    Ok(())
}

/// Toggle a favorite through a session and print the status message.
async fn handle_toggle(
    config: &Config,
    storage: Storage,
    departure: &str,
    destination: &str,
) -> anyhow::Result<()> {
    let (handle, mut status) = Session::spawn(storage, config.debounce());

    let flight = FlightDetail {
        departure_code: departure.to_string(),
        departure_name: String::new(),
        arrival_code: destination.to_string(),
        arrival_name: String::new(),
        is_favorite: false,
    };
    handle.toggle_favorite(&flight).await?;

    match status.recv().await {
        Some(message) => println!("{message}"),
        None => bail!("session closed before reporting the toggle"),
    }

    shutdown(&handle).await;
    Ok(())
}

/// Import an airport dataset from a JSON file.
fn handle_import(config: &Config, cmd: &ImportCommand) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("failed to read {}", cmd.file.display()))?;
    let airports: Vec<Airport> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", cmd.file.display()))?;

    let mut storage = open_storage(config)?;
    let imported = storage.import_airports(&airports)?;
    println!("Imported {imported} airports into {}.", storage.path().display());
    Ok(())
}

/// Show database status.
fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats()?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("fsearch status");
        println!("--------------");
        println!("Database:   {}", storage.path().display());
        println!("Airports:   {}", stats.airport_count);
        println!("Favorites:  {}", stats.favorite_count);
        println!("Size:       {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

/// View or validate configuration.
fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path: {}", config.database_path().display());
                println!();
                println!("[Search]");
                println!("  Debounce (ms): {}", config.search.debounce_ms);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

/// Shut the session down, tolerating a session that already terminated.
async fn shutdown(handle: &SessionHandle) {
    let _ = handle.shutdown().await;
    handle.closed().await;
}
