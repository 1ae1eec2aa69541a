//! Storage layer for flightsearch.
//!
//! This module provides `SQLite`-based access to the airport reference table
//! and the mutable favorite-routes table. Airport queries are read-only;
//! favorites support idempotent add, remove, and existence checks.

pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{Airport, FavoriteRoute, SearchHit};

/// Storage engine for airports and favorite routes.
///
/// Wraps a single connection over two tables:
/// - `airport`: bundled reference data, seeded via [`Storage::import_airports`]
///   and read-only afterwards
/// - `favorite`: user-created (departure, destination) pairs, unique per pair
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        schema::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // === Airport operations ===

    /// Seed the airport table from a dataset.
    ///
    /// Runs in a single transaction; returns the number of airports inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails. No rows are inserted on
    /// failure.
    pub fn import_airports(&mut self, airports: &[Airport]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for airport in airports {
            tx.execute(
                "INSERT INTO airport (name, passengers, iata_code) VALUES (?1, ?2, ?3)",
                params![airport.name, airport.passengers, airport.iata_code],
            )?;
        }
        tx.commit()?;

        info!("Imported {} airports", airports.len());
        Ok(airports.len())
    }

    /// Search airports by substring against name or IATA code.
    ///
    /// Matching is ASCII case-insensitive (SQL `LIKE`); the wildcard wrapping
    /// happens here so callers pass the raw term. Results come back in
    /// insertion order. A blank term matches every airport; callers wanting a
    /// useful result supply a non-blank term.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search_airports(&self, term: &str) -> Result<Vec<SearchHit>> {
        let pattern = format!("%{term}%");
        let mut stmt = self.conn.prepare(
            r"
            SELECT name, iata_code FROM airport
            WHERE name LIKE ?1 OR iata_code LIKE ?1
            ",
        )?;

        let hits = stmt
            .query_map([pattern], |row| {
                Ok(SearchHit {
                    name: row.get(0)?,
                    iata_code: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(hits)
    }

    /// List all possible destinations from the named airport.
    ///
    /// Returns every airport except the one whose name matches exactly,
    /// ordered by passenger volume descending so higher-traffic airports
    /// surface first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn destinations_from(&self, exclude_name: &str) -> Result<Vec<Airport>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, name, passengers, iata_code FROM airport
            WHERE name != ?1
            ORDER BY passengers DESC
            ",
        )?;

        let airports = stmt
            .query_map([exclude_name], Self::row_to_airport)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(airports)
    }

    /// Look up an airport name by its exact IATA code.
    ///
    /// Returns `Ok(None)` when no airport has that code; callers composing
    /// display rows substitute an empty name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn airport_name(&self, iata_code: &str) -> Result<Option<String>> {
        let name = self
            .conn
            .query_row(
                "SELECT name FROM airport WHERE iata_code = ?1 LIMIT 1",
                [iata_code],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }

    /// Count airports in the reference table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn airport_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM airport", [], |row| row.get(0))?;
        Ok(count)
    }

    // === Favorite operations ===

    /// Add a favorite route.
    ///
    /// Idempotent: returns `true` if a row was inserted, `false` if the pair
    /// was already favorited (no duplicate row, no error).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn add_favorite(&self, departure_code: &str, destination_code: &str) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            INSERT OR IGNORE INTO favorite (departure_code, destination_code, created_at)
            VALUES (?1, ?2, ?3)
            ",
            params![departure_code, destination_code, Utc::now().to_rfc3339()],
        )?;

        if affected > 0 {
            debug!("Favorited route {} -> {}", departure_code, destination_code);
        }
        Ok(affected > 0)
    }

    /// Remove a favorite route.
    ///
    /// Returns `true` if a row was deleted, `false` if the pair was not
    /// favorited (no-op).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove_favorite(&self, departure_code: &str, destination_code: &str) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM favorite WHERE departure_code = ?1 AND destination_code = ?2",
            params![departure_code, destination_code],
        )?;

        if affected > 0 {
            debug!(
                "Unfavorited route {} -> {}",
                departure_code, destination_code
            );
        }
        Ok(affected > 0)
    }

    /// Check whether a route is favorited.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn is_favorite(&self, departure_code: &str, destination_code: &str) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            r"
            SELECT EXISTS(
                SELECT 1 FROM favorite
                WHERE departure_code = ?1 AND destination_code = ?2
            )
            ",
            params![departure_code, destination_code],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// List all favorite routes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn favorites(&self) -> Result<Vec<FavoriteRoute>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, departure_code, destination_code, created_at FROM favorite",
        )?;

        let routes = stmt
            .query_map([], Self::row_to_favorite)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(routes)
    }

    /// Count favorite routes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn favorite_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM favorite", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let airport_count = self.airport_count()?;
        let favorite_count = self.favorite_count()?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            airport_count,
            favorite_count,
            db_size_bytes,
        })
    }

    /// Convert a database row to an Airport struct.
    fn row_to_airport(row: &rusqlite::Row) -> rusqlite::Result<Airport> {
        Ok(Airport {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            passengers: row.get(2)?,
            iata_code: row.get(3)?,
        })
    }

    /// Convert a database row to a FavoriteRoute struct.
    fn row_to_favorite(row: &rusqlite::Row) -> rusqlite::Result<FavoriteRoute> {
        let created_at_str: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(FavoriteRoute {
            id: Some(row.get(0)?),
            departure_code: row.get(1)?,
            destination_code: row.get(2)?,
            created_at,
        })
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageStats {
    /// Number of airports in the reference table.
    pub airport_count: i64,
    /// Number of favorited routes.
    pub favorite_count: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
