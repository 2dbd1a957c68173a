//! HTTP API handlers for Quake Report.
//!
//! - **GET /earthquakes**: the list screen as JSON (rows plus empty state).
//! - **GET /earthquakes/:index/open**: redirect to the row's USGS event page.
//! - **POST /earthquakes/reload**: discard results and load again.
//! - **GET /health**: liveness.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::connectivity::is_connected;
use crate::screen::{EarthquakeScreen, ScreenView};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub screen: Arc<Mutex<EarthquakeScreen>>,
}

impl AppState {
    /// Wrap a screen for sharing between handlers.
    pub fn new(screen: EarthquakeScreen) -> Self {
        Self {
            screen: Arc::new(Mutex::new(screen)),
        }
    }
}

/// Build the router with all routes and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/earthquakes", get(get_earthquakes))
        .route("/earthquakes/reload", post(reload_earthquakes))
        .route("/earthquakes/:index/open", get(open_earthquake))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// GET /earthquakes - Current state of the earthquake list.
///
/// # Response
///
/// ```json
/// {
///     "loading": false,
///     "rows": [
///         {
///             "primary_location": "Cairo, Egypt",
///             "offset": "5km N of",
///             "date": "Mar 03, 1984",
///             "time": "4:30 PM",
///             "magnitude": "6.7",
///             "magnitude_bucket": "magnitude6",
///             "magnitude_color": "#FC6644",
///             "detail_url": "https://earthquake.usgs.gov/earthquakes/eventpage/..."
///         }
///     ],
///     "empty_message": null,
///     "failure": null,
///     "error": null
/// }
/// ```
#[instrument(skip(state))]
pub async fn get_earthquakes(State(state): State<AppState>) -> Json<ScreenView> {
    let view = state.screen.lock().await.view();
    info!(
        loading = view.loading,
        rows = view.rows.len(),
        failure = ?view.failure,
        "Earthquakes queried"
    );
    Json(view)
}

/// GET /earthquakes/:index/open - Open the detail page of a row.
///
/// Returns `303 See Other` to the USGS event page, or `404` when there is
/// no row at `index`.
#[instrument(skip(state))]
pub async fn open_earthquake(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Redirect, StatusCode> {
    let url = state.screen.lock().await.detail_url(index);

    match url {
        Some(url) => {
            info!(index, url = %url, "Opening earthquake details");
            Ok(Redirect::to(&url))
        }
        None => {
            warn!(index, "No earthquake at index");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// POST /earthquakes/reload - Reset the screen and load again.
///
/// Connectivity is re-checked first. Returns `202 Accepted`; poll
/// `GET /earthquakes` for the result.
#[instrument(skip(state))]
pub async fn reload_earthquakes(State(state): State<AppState>) -> impl IntoResponse {
    let url = state.screen.lock().await.loader().url().to_string();
    let connected = is_connected(&url).await;

    state.screen.lock().await.reload(connected);
    info!(connected, "Earthquake reload requested");

    StatusCode::ACCEPTED
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
