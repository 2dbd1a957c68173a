//! External data sources.
//!
//! # Data Sources
//!
//! - [`usgs`]: USGS FDSN event service - recent earthquakes as GeoJSON

pub mod usgs;

pub use usgs::{FetchError, UsgsClient, UsgsQuery};
