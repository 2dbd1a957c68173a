//! The earthquake list screen.
//!
//! Owns one [`EarthquakeLoader`] and turns its state into what the list
//! shows: a loading flag, the rows, and the empty-state message.

use std::fmt::Display;
use std::future::Future;

use chrono::{Local, TimeZone};
use serde::Serialize;
use tracing::info;

use crate::loader::{EarthquakeLoader, LoaderState};
use crate::pipeline::{FailureCause, LoadOutcome};
use crate::presenter::{EarthquakeRow, present};

/// Empty-state text when there was no connectivity at load time.
pub const NO_INTERNET: &str = "No internet connection.";

/// Empty-state text when a finished load produced no rows.
pub const NO_EARTHQUAKES: &str = "No earthquakes found.";

/// What the list currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenView {
    /// A load is in flight.
    pub loading: bool,

    /// Rows in feed order.
    pub rows: Vec<EarthquakeRow>,

    /// Message shown in place of an empty list.
    pub empty_message: Option<&'static str>,

    /// Why the last load failed, if it did.
    pub failure: Option<FailureCause>,

    /// Human-readable failure reason.
    pub error: Option<String>,
}

/// Screen state for one lifecycle.
pub struct EarthquakeScreen {
    loader: EarthquakeLoader,
    connected: bool,
}

impl EarthquakeScreen {
    /// Create the screen and start loading when connected.
    ///
    /// Without connectivity the loader is never started.
    pub fn create(mut loader: EarthquakeLoader, connected: bool) -> Self {
        if connected {
            loader.start();
        } else {
            info!(url = %loader.url(), "No connectivity, skipping earthquake load");
        }
        Self { loader, connected }
    }

    /// The loader backing this screen.
    pub fn loader(&self) -> &EarthquakeLoader {
        &self.loader
    }

    /// Discard current results and load again.
    pub fn reload(&mut self, connected: bool) {
        self.loader.reset();
        self.connected = connected;
        if connected {
            self.loader.start();
        } else {
            info!(url = %self.loader.url(), "No connectivity, skipping earthquake reload");
        }
    }

    /// Resolve once the current load is no longer in flight.
    pub fn ready(&self) -> impl Future<Output = LoaderState> + Send + 'static {
        self.loader.ready()
    }

    /// Detail link for the row at `index`.
    pub fn detail_url(&self, index: usize) -> Option<String> {
        self.loader
            .state()
            .outcome()
            .and_then(|outcome| outcome.earthquakes().get(index))
            .map(|earthquake| earthquake.url.clone())
    }

    /// Current view with times in local time.
    pub fn view(&self) -> ScreenView {
        self.view_in(&Local)
    }

    /// Current view with times rendered in `tz`.
    pub fn view_in<Tz>(&self, tz: &Tz) -> ScreenView
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if !self.connected {
            return ScreenView {
                loading: false,
                rows: Vec::new(),
                empty_message: Some(NO_INTERNET),
                failure: None,
                error: None,
            };
        }

        match self.loader.state() {
            LoaderState::Idle => ScreenView {
                loading: false,
                rows: Vec::new(),
                empty_message: None,
                failure: None,
                error: None,
            },
            LoaderState::Loading => ScreenView {
                loading: true,
                rows: Vec::new(),
                empty_message: None,
                failure: None,
                error: None,
            },
            LoaderState::Cancelled => ScreenView {
                loading: false,
                rows: Vec::new(),
                empty_message: Some(NO_EARTHQUAKES),
                failure: None,
                error: None,
            },
            LoaderState::Ready(outcome) => {
                let rows = present(outcome.earthquakes(), tz);
                let empty_message = rows.is_empty().then_some(NO_EARTHQUAKES);
                let error = match &outcome {
                    LoadOutcome::Failed { reason, .. } => Some(reason.clone()),
                    _ => None,
                };
                ScreenView {
                    loading: false,
                    rows,
                    empty_message,
                    failure: outcome.failure(),
                    error,
                }
            }
        }
    }
}
