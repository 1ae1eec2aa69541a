//! `SQLite` schema definitions for flightsearch.
//!
//! Two tables back the application: `airport` holds the bundled reference
//! dataset and `favorite` holds user-created routes. A small `metadata` table
//! carries the schema version stamp.

use rusqlite::Connection;

use crate::error::{Error, Result};

/// The schema version written by this binary.
///
/// There is no migration machinery: the airport dataset ships pre-built, so a
/// database stamped with a newer version is rejected rather than upgraded.
pub const SCHEMA_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// SQL statement to create the airport reference table.
///
/// The three data columns (name, passengers, `iata_code`) are the
/// compatibility contract with any replacement dataset.
pub const CREATE_AIRPORT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS airport (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    passengers INTEGER NOT NULL,
    iata_code TEXT NOT NULL
)
";

/// SQL statement to create the favorite routes table.
pub const CREATE_FAVORITE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS favorite (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    departure_code TEXT NOT NULL,
    destination_code TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on `iata_code` for exact lookups.
pub const CREATE_AIRPORT_CODE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_airport_code ON airport(iata_code)
";

/// SQL statement to create an index on passengers for destination ordering.
pub const CREATE_AIRPORT_PASSENGERS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_airport_passengers ON airport(passengers DESC)
";

/// SQL statement to create the uniqueness index on favorite route pairs.
///
/// `INSERT OR IGNORE` against this index is what makes favoriting idempotent.
pub const CREATE_FAVORITE_ROUTE_INDEX: &str = r"
CREATE UNIQUE INDEX IF NOT EXISTS idx_favorite_route
ON favorite(departure_code, destination_code)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_AIRPORT_TABLE,
    CREATE_FAVORITE_TABLE,
    CREATE_AIRPORT_CODE_INDEX,
    CREATE_AIRPORT_PASSENGERS_INDEX,
    CREATE_FAVORITE_ROUTE_INDEX,
    CREATE_METADATA_TABLE,
];

/// Initialize the database schema.
///
/// Creates all tables and indexes if they don't exist, stamps the schema
/// version on a fresh database, and rejects databases written by a newer
/// binary.
///
/// # Errors
///
/// Returns an error if schema creation fails or the stored version is newer
/// than [`SCHEMA_VERSION`].
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(Error::SchemaVersion {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found < SCHEMA_VERSION {
        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            (VERSION_KEY, SCHEMA_VERSION.to_string()),
        )?;
    }

    Ok(())
}

/// Get the schema version stamped in the database.
///
/// Returns 0 for a fresh database with no stamp.
fn schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(value) => value.parse().map_err(|_| Error::MetadataInvalid {
            key: VERSION_KEY.to_string(),
            value,
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");

        for table in ["airport", "favorite", "metadata"] {
            let count: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }

    #[test]
    fn test_initialize_schema_stamps_version() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");

        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_initialize_schema_idempotent() {
        let conn = create_test_db();

        initialize_schema(&conn).expect("first init failed");
        initialize_schema(&conn).expect("second init failed");

        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_initialize_schema_rejects_newer_version() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "UPDATE metadata SET value = ?1 WHERE key = ?2",
            ((SCHEMA_VERSION + 1).to_string(), VERSION_KEY),
        )
        .unwrap();

        let result = initialize_schema(&conn);
        assert!(matches!(result, Err(Error::SchemaVersion { .. })));
    }

    #[test]
    fn test_favorite_route_index_is_unique() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO favorite (departure_code, destination_code) VALUES ('FCO', 'CPH')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO favorite (departure_code, destination_code) VALUES ('FCO', 'CPH')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_indexes_created() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");

        let indexes: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='index'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(std::result::Result::ok)
            .collect();

        assert!(indexes.iter().any(|n| n.contains("code")));
        assert!(indexes.iter().any(|n| n.contains("passengers")));
        assert!(indexes.iter().any(|n| n.contains("route")));
    }

    #[test]
    fn test_airport_table_contains_contract_columns() {
        assert!(CREATE_AIRPORT_TABLE.contains("name TEXT NOT NULL"));
        assert!(CREATE_AIRPORT_TABLE.contains("passengers INTEGER NOT NULL"));
        assert!(CREATE_AIRPORT_TABLE.contains("iata_code TEXT NOT NULL"));
    }
}
