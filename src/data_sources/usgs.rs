//! USGS earthquake catalog client.
//!
//! The FDSN event web service returns recent earthquakes as a GeoJSON
//! `FeatureCollection`. Only the raw body is fetched here; decoding lives in
//! [`crate::parser`].
//!
//! # API Reference
//!
//! See: <https://earthquake.usgs.gov/fdsnws/event/1/>

use std::time::Duration;

use reqwest::{StatusCode, Url};

/// Base URL for the USGS FDSN event API.
pub const USGS_API_BASE: &str = "https://earthquake.usgs.gov/fdsnws/event/1";

/// Time allowed to establish the connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Time allowed between reads of the response body.
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Reasons a fetch produced no body.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid feed url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected response status: {0}")]
    Status(StatusCode),
}

/// Query parameters for the `/query` endpoint.
///
/// The defaults select the ten most recent earthquakes of magnitude 5 or
/// more, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct UsgsQuery {
    /// Response format (`geojson`).
    pub format: String,

    /// Event type filter (`earthquake`).
    pub event_type: String,

    /// Sort order (`time`, `time-asc`, `magnitude`, `magnitude-asc`).
    pub order_by: String,

    /// Minimum magnitude, inclusive.
    pub min_magnitude: u32,

    /// Maximum number of events returned.
    pub limit: u32,
}

impl Default for UsgsQuery {
    fn default() -> Self {
        Self {
            format: "geojson".to_string(),
            event_type: "earthquake".to_string(),
            order_by: "time".to_string(),
            min_magnitude: 5,
            limit: 10,
        }
    }
}

impl UsgsQuery {
    /// Render the query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        format!(
            "format={}&eventtype={}&orderby={}&minmag={}&limit={}",
            urlencoding::encode(&self.format),
            urlencoding::encode(&self.event_type),
            urlencoding::encode(&self.order_by),
            self.min_magnitude,
            self.limit
        )
    }

    /// Full request URL against the public USGS endpoint.
    pub fn url(&self) -> String {
        format!("{}/query?{}", USGS_API_BASE, self.to_query_string())
    }
}

/// Client for the USGS event feed.
#[derive(Clone)]
pub struct UsgsClient {
    client: reqwest::Client,
}

impl UsgsClient {
    /// Create a new client with the feed's connect and read timeouts.
    ///
    /// The feed URL is passed per request; see [`UsgsQuery::url`].
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and return the whole response body as text.
    ///
    /// Only `200 OK` counts as success. The response, and with it the
    /// connection, is dropped on every return path.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        Ok(body)
    }
}
