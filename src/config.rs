//! Runtime configuration from environment variables.

use std::env;

use crate::data_sources::UsgsQuery;

/// Default port if not specified via environment variable.
pub const DEFAULT_PORT: u16 = 3000;

/// Service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Port the HTTP API listens on (`QUAKEREPORT_PORT`).
    pub port: u16,

    /// Feed URL to load (`QUAKEREPORT_FEED_URL`). Defaults to the ten most
    /// recent magnitude 5+ earthquakes.
    pub feed_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            feed_url: UsgsQuery::default().url(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("QUAKEREPORT_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let feed_url = lookup("QUAKEREPORT_FEED_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.feed_url);

        Self { port, feed_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.port, 3000);
        assert_eq!(
            config.feed_url,
            "https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson&eventtype=earthquake&orderby=time&minmag=5&limit=10"
        );
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            ("QUAKEREPORT_PORT", "8081"),
            ("QUAKEREPORT_FEED_URL", "http://localhost:9000/query"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.port, 8081);
        assert_eq!(config.feed_url, "http://localhost:9000/query");
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = Config::from_lookup(|key| {
            (key == "QUAKEREPORT_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
