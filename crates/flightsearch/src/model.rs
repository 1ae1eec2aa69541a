//! Core data types for flightsearch.
//!
//! This module defines the persistent rows (`Airport`, `FavoriteRoute`) and
//! the derived rows the session composes for display (`SearchHit`,
//! `FlightDetail`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An airport from the bundled reference dataset.
///
/// Airports are read-mostly: they are seeded once via `fsearch import` and
/// never modified at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    /// Unique identifier (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,

    /// Full airport name, e.g. "Rome Fiumicino".
    pub name: String,

    /// Annual passenger volume, used to rank destinations.
    pub passengers: i64,

    /// Three-letter IATA code, e.g. "FCO".
    pub iata_code: String,
}

impl Airport {
    /// Create a new airport record ready for import.
    #[must_use]
    pub fn new(name: impl Into<String>, iata_code: impl Into<String>, passengers: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            passengers,
            iata_code: iata_code.into(),
        }
    }
}

/// A favorited route between two airports.
///
/// At most one row exists per (departure, destination) pair; inserting a
/// duplicate is a silent no-op at the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRoute {
    /// Unique identifier (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,

    /// IATA code of the departure airport.
    pub departure_code: String,

    /// IATA code of the destination airport.
    pub destination_code: String,

    /// When the route was favorited.
    pub created_at: DateTime<Utc>,
}

impl FavoriteRoute {
    /// Create a new favorite route with the current timestamp.
    #[must_use]
    pub fn new(departure_code: impl Into<String>, destination_code: impl Into<String>) -> Self {
        Self {
            id: None,
            departure_code: departure_code.into(),
            destination_code: destination_code.into(),
            created_at: Utc::now(),
        }
    }

    /// Check whether this route connects the given pair of codes.
    #[must_use]
    pub fn matches(&self, departure_code: &str, destination_code: &str) -> bool {
        self.departure_code == departure_code && self.destination_code == destination_code
    }
}

/// A single row in the live-search result list.
///
/// A projection of [`Airport`] carrying only what the search dropdown shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Full airport name.
    pub name: String,

    /// Three-letter IATA code.
    pub iata_code: String,
}

impl SearchHit {
    /// Create a search hit.
    #[must_use]
    pub fn new(name: impl Into<String>, iata_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iata_code: iata_code.into(),
        }
    }
}

impl std::fmt::Display for SearchHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.iata_code)
    }
}

/// A fully composed flight row: an airport pair plus its favorite flag.
///
/// Derived by the session for display; recomputed on every underlying change
/// and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightDetail {
    /// IATA code of the departure airport.
    pub departure_code: String,

    /// Name of the departure airport (empty if the code is unknown).
    pub departure_name: String,

    /// IATA code of the arrival airport.
    pub arrival_code: String,

    /// Name of the arrival airport (empty if the code is unknown).
    pub arrival_name: String,

    /// Whether this route is currently favorited.
    pub is_favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_new() {
        let airport = Airport::new("Rome Fiumicino", "FCO", 1000);

        assert!(airport.id.is_none());
        assert_eq!(airport.name, "Rome Fiumicino");
        assert_eq!(airport.iata_code, "FCO");
        assert_eq!(airport.passengers, 1000);
    }

    #[test]
    fn test_favorite_route_new() {
        let route = FavoriteRoute::new("FCO", "CPH");

        assert!(route.id.is_none());
        assert_eq!(route.departure_code, "FCO");
        assert_eq!(route.destination_code, "CPH");
    }

    #[test]
    fn test_favorite_route_matches() {
        let route = FavoriteRoute::new("FCO", "CPH");

        assert!(route.matches("FCO", "CPH"));
        assert!(!route.matches("CPH", "FCO")); // Direction matters
        assert!(!route.matches("FCO", "ARN"));
    }

    #[test]
    fn test_search_hit_display() {
        let hit = SearchHit::new("Copenhagen", "CPH");
        assert_eq!(hit.to_string(), "Copenhagen (CPH)");
    }

    #[test]
    fn test_airport_serialization_skips_missing_id() {
        let airport = Airport::new("Copenhagen", "CPH", 500);
        let json = serde_json::to_string(&airport).unwrap();

        assert!(!json.contains("\"id\""));

        let deserialized: Airport = serde_json::from_str(&json).unwrap();
        assert_eq!(airport, deserialized);
    }

    #[test]
    fn test_airport_deserializes_dataset_row() {
        // The shape of a bundled dataset entry is a compatibility contract.
        let json = r#"{"name": "Stockholm Arlanda", "iata_code": "ARN", "passengers": 650}"#;
        let airport: Airport = serde_json::from_str(json).unwrap();

        assert_eq!(airport.name, "Stockholm Arlanda");
        assert_eq!(airport.iata_code, "ARN");
        assert_eq!(airport.passengers, 650);
    }

    #[test]
    fn test_flight_detail_serialization() {
        let flight = FlightDetail {
            departure_code: "FCO".to_string(),
            departure_name: "Rome Fiumicino".to_string(),
            arrival_code: "CPH".to_string(),
            arrival_name: "Copenhagen".to_string(),
            is_favorite: true,
        };

        let json = serde_json::to_string(&flight).unwrap();
        let deserialized: FlightDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(flight, deserialized);
    }
}
