//! Quake Report - recent significant earthquakes from the USGS event feed.
//!
//! # API Endpoints
//!
//! - `GET /earthquakes` - The earthquake list
//! - `GET /earthquakes/:index/open` - Redirect to a row's USGS event page
//! - `POST /earthquakes/reload` - Load the feed again
//! - `GET /health` - Health check

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use quakereport::api::{AppState, router};
use quakereport::config::Config;
use quakereport::connectivity::is_connected;
use quakereport::data_sources::UsgsClient;
use quakereport::loader::EarthquakeLoader;
use quakereport::screen::EarthquakeScreen;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("quakereport=info".parse()?))
        .init();

    let config = Config::from_env();
    info!(port = config.port, feed_url = %config.feed_url, "Starting Quake Report");

    let client = UsgsClient::new()?;
    let loader = EarthquakeLoader::new(client, &config.feed_url);

    let connected = is_connected(&config.feed_url).await;
    let screen = EarthquakeScreen::create(loader, connected);
    let app = router(AppState::new(screen));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, connected, "Quake Report is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
