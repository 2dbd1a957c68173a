//! Quake Report - recent significant earthquakes from the USGS event feed.
//!
//! # Overview
//!
//! Quake Report loads the ten most recent magnitude 5+ earthquakes from the
//! USGS FDSN event service once per screen lifecycle, and serves them as
//! display-ready rows.
//!
//! Each load runs a straight pipeline:
//!
//! 1. fetch the GeoJSON feed ([`data_sources::usgs`])
//! 2. decode features into [`model::Earthquake`] records ([`parser`])
//! 3. tag the result ([`pipeline::LoadOutcome`])
//! 4. format rows for display ([`presenter`])
//!
//! # Modules
//!
//! - [`model`]: Earthquake record and feed types
//! - [`data_sources`]: USGS client
//! - [`parser`]: GeoJSON decoding
//! - [`pipeline`]: Fetch-then-parse with tagged outcomes
//! - [`loader`]: Background load task with start/cancel/reset
//! - [`presenter`]: Row formatting
//! - [`screen`]: Screen state and empty-state messages
//! - [`connectivity`]: Reachability probe
//! - [`config`]: Environment configuration
//! - [`api`]: HTTP API handlers

pub mod api;
pub mod config;
pub mod connectivity;
pub mod data_sources;
pub mod loader;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod presenter;
pub mod screen;
