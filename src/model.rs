//! Data models for Quake Report.
//!
//! [`Earthquake`] is the record handed from the parser to the presenter.
//! The remaining types mirror the slice of the USGS GeoJSON feed that the
//! parser actually reads.

use serde::{Deserialize, Deserializer, Serialize};

/// A single earthquake event.
///
/// Built by the parser from one GeoJSON feature and never mutated afterwards.
/// A load cycle owns its records; the next load replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Earthquake {
    /// Magnitude as reported by USGS (e.g. `6.7`).
    pub magnitude: f64,

    /// Place description, either `"<offset> of <primary>"` such as
    /// `"5km N of Cairo, Egypt"` or a bare place name such as
    /// `"Pacific-Antarctic Ridge"`.
    pub location: String,

    /// Event time in milliseconds since the Unix epoch.
    pub time_in_millis: i64,

    /// USGS event page with more details.
    pub url: String,
}

impl Earthquake {
    /// Create a new earthquake record.
    pub fn new(magnitude: f64, location: &str, time_in_millis: i64, url: &str) -> Self {
        Self {
            magnitude,
            location: location.to_string(),
            time_in_millis,
            url: url.to_string(),
        }
    }
}

// ============================================================================
// Feed types
// ============================================================================

/// Top level of the USGS GeoJSON response.
///
/// Features stay as raw JSON values so each one can be decoded on its own
/// and a bad entry only stops the walk at that entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// One entry per earthquake, newest first for `orderby=time`.
    pub features: Vec<serde_json::Value>,
}

/// A single GeoJSON feature.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Event attributes.
    pub properties: Properties,
}

/// The event attributes read from each feature.
///
/// All four fields are required; a feature without one of them is rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct Properties {
    /// Magnitude.
    pub mag: f64,

    /// Place description. USGS sends `null` for some events; that becomes an
    /// empty string, but the key itself must be present.
    #[serde(deserialize_with = "nullable_string")]
    pub place: String,

    /// Event time (epoch milliseconds).
    pub time: i64,

    /// Event page URL.
    pub url: String,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<Properties> for Earthquake {
    fn from(properties: Properties) -> Self {
        Self {
            magnitude: properties.mag,
            location: properties.place,
            time_in_millis: properties.time,
            url: properties.url,
        }
    }
}
