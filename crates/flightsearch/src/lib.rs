//! `flightsearch` - Offline airport search and favorite flight routes
//!
//! This library provides the core functionality for searching a bundled
//! airport dataset, listing reachable destinations ranked by passenger
//! volume, and managing favorited routes, all backed by a local `SQLite`
//! database.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod session;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Airport, FavoriteRoute, FlightDetail, SearchHit};
pub use session::{Session, SessionHandle, ViewState, DEFAULT_DEBOUNCE};
pub use storage::{Storage, StorageStats};
