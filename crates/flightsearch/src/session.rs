//! The flight-search session: reactive view-state composition.
//!
//! A [`Session`] owns the [`Storage`] on a background tokio task and turns
//! user events (search text, result selection, favorite toggles) into exactly
//! one active [`ViewState`], published over a watch channel. Transient status
//! messages (favorite added/removed, storage failures) go over a separate
//! mpsc channel and are consumed once by the caller.
//!
//! Search input is debounced: each text change arms a timer carrying a
//! generation number, and only the timer whose generation is still current
//! when it fires runs the query. A later keystroke (or a selection) bumps the
//! generation, so stale timers are ignored and no superseded results are ever
//! delivered.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{FlightDetail, SearchHit};
use crate::storage::Storage;

/// Debounce window applied to search input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Capacity of the command and status channels.
const CHANNEL_CAPACITY: usize = 32;

/// The active view of a session. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// The favorites list. Initial state; active whenever the search text is
    /// blank.
    Favorites(Vec<FlightDetail>),

    /// Live search results. Active whenever the search text is non-blank;
    /// the list is empty until the debounced query lands.
    Search(Vec<SearchHit>),

    /// Destinations reachable from a selected airport, ordered by passenger
    /// volume descending and annotated with favorite flags.
    Destinations {
        /// The airport the user selected.
        origin: SearchHit,
        /// The composed flight rows.
        flights: Vec<FlightDetail>,
    },
}

/// Commands accepted by the session task.
#[derive(Debug)]
enum Command {
    /// The search text changed.
    SetSearchText(String),
    /// The user selected a search result.
    SelectHit(SearchHit),
    /// The user toggled the favorite flag on a flight row.
    ToggleFavorite {
        departure_code: String,
        arrival_code: String,
    },
    /// Terminate the session task.
    Shutdown,
}

/// A cloneable handle to a running session.
///
/// Dropping all handles (or calling [`SessionHandle::shutdown`]) terminates
/// the session task and releases the storage.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<ViewState>,
    search_text: watch::Receiver<String>,
}

impl SessionHandle {
    /// Update the search text.
    ///
    /// Blank text switches to the favorites view immediately; non-blank text
    /// switches to the search view and schedules a debounced query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] if the session has terminated.
    pub async fn update_search_text(&self, text: impl Into<String>) -> Result<()> {
        self.send(Command::SetSearchText(text.into())).await
    }

    /// Select a search result, switching to the destinations view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] if the session has terminated.
    pub async fn select_search_result(&self, hit: SearchHit) -> Result<()> {
        self.send(Command::SelectHit(hit)).await
    }

    /// Toggle the favorite flag on a flight row.
    ///
    /// Emits an "added" or "removed" status message and recomputes the active
    /// view so favorite flags stay current.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] if the session has terminated.
    pub async fn toggle_favorite(&self, flight: &FlightDetail) -> Result<()> {
        self.send(Command::ToggleFavorite {
            departure_code: flight.departure_code.clone(),
            arrival_code: flight.arrival_code.clone(),
        })
        .await
    }

    /// Ask the session task to terminate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] if the session already terminated.
    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    /// Wait until the session task has terminated.
    pub async fn closed(&self) {
        self.commands.closed().await;
    }

    /// Get a receiver for the current view state.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Get a receiver for the current search text.
    #[must_use]
    pub fn search_text(&self) -> watch::Receiver<String> {
        self.search_text.clone()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| Error::SessionClosed)
    }
}

/// Factory for spawning session tasks.
#[derive(Debug)]
pub struct Session;

impl Session {
    /// Spawn a session task owning the given storage.
    ///
    /// Returns a handle for sending events and a receiver for transient
    /// status messages. The initial view is the favorites list.
    #[must_use]
    pub fn spawn(storage: Storage, debounce: Duration) -> (SessionHandle, mpsc::Receiver<String>) {
        let (command_tx, command_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (status_tx, status_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ViewState::Favorites(Vec::new()));
        let (text_tx, text_rx) = watch::channel(String::new());
        let (timer_tx, timer_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let worker = Worker {
            storage,
            debounce,
            origin: None,
            generation: 0,
            state: state_tx,
            search_text: text_tx,
            status: status_tx,
            timers: timer_tx,
        };
        tokio::spawn(worker.run(command_rx, timer_rx));

        (
            SessionHandle {
                commands: command_tx,
                state: state_rx,
                search_text: text_rx,
            },
            status_rx,
        )
    }
}

/// The session task state. Owns the storage; all queries run here, off the
/// caller's thread.
struct Worker {
    storage: Storage,
    debounce: Duration,
    origin: Option<SearchHit>,
    /// Bumped on every text change or selection; stale timers carry an older
    /// value and are ignored when they fire.
    generation: u64,
    state: watch::Sender<ViewState>,
    search_text: watch::Sender<String>,
    status: mpsc::Sender<String>,
    timers: mpsc::Sender<u64>,
}

impl Worker {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>, mut timers: mpsc::Receiver<u64>) {
        self.publish_favorites();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::SetSearchText(text)) => self.on_search_text(text),
                    Some(Command::SelectHit(hit)) => self.on_select(hit),
                    Some(Command::ToggleFavorite { departure_code, arrival_code }) => {
                        self.on_toggle(&departure_code, &arrival_code);
                    }
                    Some(Command::Shutdown) | None => break,
                },
                Some(generation) = timers.recv() => self.on_timer(generation),
            }
        }
        debug!("Session terminated");
    }

    /// Handle a search text change.
    fn on_search_text(&mut self, text: String) {
        let blank = text.trim().is_empty();
        self.search_text.send_replace(text);
        self.generation = self.generation.wrapping_add(1);

        if blank {
            self.publish_favorites();
            return;
        }

        // Switch the view tag right away; the result list stays empty until
        // the debounced query lands.
        if !matches!(&*self.state.borrow(), ViewState::Search(_)) {
            self.state.send_replace(ViewState::Search(Vec::new()));
        }

        let generation = self.generation;
        let debounce = self.debounce;
        let timers = self.timers.clone();
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let _ = timers.send(generation).await;
        });
    }

    /// Handle a debounce timer firing.
    fn on_timer(&mut self, generation: u64) {
        if generation != self.generation {
            debug!("Ignoring superseded search timer (generation {generation})");
            return;
        }
        let term = self.search_text.borrow().clone();
        if term.trim().is_empty() {
            return;
        }

        match self.storage.search_airports(&term) {
            Ok(hits) => {
                debug!("Search for '{term}' found {} hits", hits.len());
                self.state.send_replace(ViewState::Search(hits));
            }
            Err(err) => self.report_failure("search", &err),
        }
    }

    /// Handle a search result selection.
    fn on_select(&mut self, hit: SearchHit) {
        // Invalidates any pending search timer.
        self.generation = self.generation.wrapping_add(1);

        match self.build_destinations(&hit) {
            Ok(flights) => {
                self.origin = Some(hit.clone());
                self.state.send_replace(ViewState::Destinations {
                    origin: hit,
                    flights,
                });
            }
            Err(err) => self.report_failure("destinations", &err),
        }
    }

    /// Handle a favorite toggle.
    fn on_toggle(&mut self, departure_code: &str, arrival_code: &str) {
        match self.toggle(departure_code, arrival_code) {
            Ok(message) => {
                let _ = self.status.try_send(message);
                self.refresh_active_view();
            }
            Err(err) => self.report_failure("favorite toggle", &err),
        }
    }

    /// Flip the favorite flag for a route and build the status message.
    fn toggle(&self, departure_code: &str, arrival_code: &str) -> Result<String> {
        if self.storage.is_favorite(departure_code, arrival_code)? {
            self.storage.remove_favorite(departure_code, arrival_code)?;
            Ok(format!(
                "Flight from {departure_code} to {arrival_code} removed from favorites."
            ))
        } else {
            self.storage.add_favorite(departure_code, arrival_code)?;
            Ok(format!(
                "Flight from {departure_code} to {arrival_code} added to favorites!"
            ))
        }
    }

    /// Recompute the active view after a favorites mutation.
    ///
    /// Search results carry no favorite flags, so that view needs no refresh.
    fn refresh_active_view(&mut self) {
        let showing_favorites = matches!(&*self.state.borrow(), ViewState::Favorites(_));
        if showing_favorites {
            self.publish_favorites();
            return;
        }

        let showing_destinations = matches!(&*self.state.borrow(), ViewState::Destinations { .. });
        if showing_destinations {
            if let Some(origin) = self.origin.clone() {
                match self.build_destinations(&origin) {
                    Ok(flights) => {
                        self.state
                            .send_replace(ViewState::Destinations { origin, flights });
                    }
                    Err(err) => self.report_failure("destinations", &err),
                }
            }
        }
    }

    /// Build and publish the favorites view.
    fn publish_favorites(&mut self) {
        match self.build_favorites() {
            Ok(flights) => {
                self.state.send_replace(ViewState::Favorites(flights));
            }
            Err(err) => self.report_failure("favorites", &err),
        }
    }

    /// Join the favorites table with airport name lookups.
    fn build_favorites(&self) -> Result<Vec<FlightDetail>> {
        let routes = self.storage.favorites()?;
        let mut flights = Vec::with_capacity(routes.len());
        for route in routes {
            let departure_name = self.lookup_name(&route.departure_code)?;
            let arrival_name = self.lookup_name(&route.destination_code)?;
            flights.push(FlightDetail {
                departure_code: route.departure_code,
                departure_name,
                arrival_code: route.destination_code,
                arrival_name,
                is_favorite: true,
            });
        }
        Ok(flights)
    }

    /// Build the destination rows for an origin, annotated with favorite
    /// flags.
    fn build_destinations(&self, origin: &SearchHit) -> Result<Vec<FlightDetail>> {
        let airports = self.storage.destinations_from(&origin.name)?;
        let mut flights = Vec::with_capacity(airports.len());
        for airport in airports {
            let is_favorite = self
                .storage
                .is_favorite(&origin.iata_code, &airport.iata_code)?;
            flights.push(FlightDetail {
                departure_code: origin.iata_code.clone(),
                departure_name: origin.name.clone(),
                arrival_code: airport.iata_code,
                arrival_name: airport.name,
                is_favorite,
            });
        }
        Ok(flights)
    }

    /// Name for a code, with an empty-string fallback for unknown codes.
    fn lookup_name(&self, iata_code: &str) -> Result<String> {
        Ok(self.storage.airport_name(iata_code)?.unwrap_or_default())
    }

    /// Surface a storage failure: log it and emit a generic status message.
    fn report_failure(&self, context: &str, err: &Error) {
        warn!("{context} failed: {err}");
        let _ = self
            .status
            .try_send(format!("Something went wrong while loading {context}."));
    }
}
