//! The fetch-then-parse pipeline.
//!
//! [`fetch_earthquake_data`] never fails outward. Every failure is logged and
//! folded into a [`LoadOutcome`] whose tag tells the caller what went wrong.

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::data_sources::{FetchError, UsgsClient};
use crate::model::Earthquake;
use crate::parser::{ParseError, parse_feed};

/// Which step of the pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "status")]
pub enum FailureCause {
    /// The feed URL could not be parsed; no request was made.
    InvalidUrl,
    /// Connect, timeout or read failure.
    Network,
    /// The server answered with something other than `200 OK`.
    HttpStatus(u16),
    /// The server answered with an empty body.
    NoData,
    /// The body was not a usable feed document or had a bad feature.
    MalformedFeed,
}

impl From<&FetchError> for FailureCause {
    fn from(error: &FetchError) -> Self {
        match error {
            FetchError::InvalidUrl { .. } => FailureCause::InvalidUrl,
            FetchError::Request(_) => FailureCause::Network,
            FetchError::Status(status) => FailureCause::HttpStatus(status.as_u16()),
        }
    }
}

impl From<&ParseError> for FailureCause {
    fn from(error: &ParseError) -> Self {
        match error {
            ParseError::NoData => FailureCause::NoData,
            ParseError::Document(_) | ParseError::Feature { .. } => FailureCause::MalformedFeed,
        }
    }
}

/// Result of one load cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum LoadOutcome {
    /// The feed parsed cleanly and had at least one earthquake.
    Loaded { earthquakes: Vec<Earthquake> },

    /// The feed parsed cleanly and had no earthquakes.
    Empty,

    /// The fetch or the parse failed. `partial` holds the earthquakes decoded
    /// before a bad feature, in feed order.
    Failed {
        cause: FailureCause,
        reason: String,
        partial: Vec<Earthquake>,
    },
}

impl LoadOutcome {
    /// Build the outcome for a cleanly parsed feed.
    pub fn from_earthquakes(earthquakes: Vec<Earthquake>) -> Self {
        if earthquakes.is_empty() {
            LoadOutcome::Empty
        } else {
            LoadOutcome::Loaded { earthquakes }
        }
    }

    /// The earthquakes to display; partial results for a failed load.
    pub fn earthquakes(&self) -> &[Earthquake] {
        match self {
            LoadOutcome::Loaded { earthquakes } => earthquakes,
            LoadOutcome::Empty => &[],
            LoadOutcome::Failed { partial, .. } => partial,
        }
    }

    /// Collapse into a plain list, dropping the failure detail.
    pub fn into_earthquakes(self) -> Vec<Earthquake> {
        match self {
            LoadOutcome::Loaded { earthquakes } => earthquakes,
            LoadOutcome::Empty => Vec::new(),
            LoadOutcome::Failed { partial, .. } => partial,
        }
    }

    /// The failure cause, if the load failed.
    pub fn failure(&self) -> Option<FailureCause> {
        match self {
            LoadOutcome::Failed { cause, .. } => Some(*cause),
            _ => None,
        }
    }
}

/// Fetch the feed at `url` and parse it into earthquakes.
#[instrument(skip(client))]
pub async fn fetch_earthquake_data(client: &UsgsClient, url: &str) -> LoadOutcome {
    let body = match client.fetch(url).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Problem retrieving the earthquake JSON results");
            return LoadOutcome::Failed {
                cause: FailureCause::from(&e),
                reason: e.to_string(),
                partial: Vec::new(),
            };
        }
    };

    match parse_feed(&body) {
        Ok(earthquakes) => {
            info!(count = earthquakes.len(), "Earthquakes loaded");
            LoadOutcome::from_earthquakes(earthquakes)
        }
        Err(e) => {
            let cause = FailureCause::from(&e);
            let reason = e.to_string();
            let partial = e.into_parsed();
            warn!(
                error = %reason,
                kept = partial.len(),
                "Problem parsing the earthquake JSON results"
            );
            LoadOutcome::Failed {
                cause,
                reason,
                partial,
            }
        }
    }
}
