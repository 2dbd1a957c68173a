//! Network reachability probe.
//!
//! The screen checks this before starting a load; when the feed host cannot
//! be resolved the pipeline is never run.

use std::time::Duration;

use reqwest::Url;
use tokio::net::lookup_host;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Upper bound on the DNS lookup.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Whether the host of `feed_url` resolves to at least one address.
///
/// A URL without a host cannot be probed and counts as connected, so the
/// load runs and reports the bad URL itself.
pub async fn is_connected(feed_url: &str) -> bool {
    let Some((host, port)) = Url::parse(feed_url).ok().and_then(|url| {
        let host = url.host_str()?.to_string();
        Some((host, url.port_or_known_default().unwrap_or(443)))
    }) else {
        debug!(url = %feed_url, "Feed URL has no host to probe");
        return true;
    };

    match timeout(PROBE_TIMEOUT, lookup_host((host.as_str(), port))).await {
        Ok(Ok(mut addrs)) => addrs.next().is_some(),
        Ok(Err(e)) => {
            warn!(host = %host, error = %e, "Feed host did not resolve");
            false
        }
        Err(_) => {
            warn!(host = %host, "Feed host lookup timed out");
            false
        }
    }
}
