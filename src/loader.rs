//! Background loading of the earthquake feed.
//!
//! An [`EarthquakeLoader`] runs at most one fetch-and-parse pipeline at a
//! time on a tokio task. Its state is published on a `watch` channel so
//! callers can wait for the result without polling.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::data_sources::UsgsClient;
use crate::pipeline::{LoadOutcome, fetch_earthquake_data};

/// Where a loader is in its cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderState {
    /// Nothing started yet, or results were discarded by a reset.
    Idle,
    /// A pipeline is in flight.
    Loading,
    /// The pipeline finished.
    Ready(LoadOutcome),
    /// The in-flight pipeline was aborted.
    Cancelled,
}

impl LoaderState {
    /// Whether a pipeline is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoaderState::Loading)
    }

    /// The finished outcome, if any.
    pub fn outcome(&self) -> Option<&LoadOutcome> {
        match self {
            LoaderState::Ready(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// One-shot loader for a single feed URL.
pub struct EarthquakeLoader {
    client: UsgsClient,
    url: String,
    state: Arc<watch::Sender<LoaderState>>,
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl EarthquakeLoader {
    /// Create an idle loader for `url`.
    pub fn new(client: UsgsClient, url: &str) -> Self {
        let (state, _) = watch::channel(LoaderState::Idle);
        Self {
            client,
            url: url.to_string(),
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    /// The feed URL this loader fetches.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LoaderState {
        self.state.borrow().clone()
    }

    /// Start a load.
    ///
    /// Only starts from `Idle` or `Cancelled`; returns `false` while a load is
    /// in flight or a result is already available. Must be called within a
    /// tokio runtime.
    pub fn start(&mut self) -> bool {
        let startable = matches!(
            *self.state.borrow(),
            LoaderState::Idle | LoaderState::Cancelled
        );
        if !startable {
            debug!(url = %self.url, "Load already started");
            return false;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(LoaderState::Loading);

        let client = self.client.clone();
        let url = self.url.clone();
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);

        self.task = Some(tokio::spawn(async move {
            let outcome = fetch_earthquake_data(&client, &url).await;
            state.send_if_modified(|s| {
                if !s.is_loading() || current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *s = LoaderState::Ready(outcome);
                true
            });
        }));

        info!(url = %self.url, "Earthquake load started");
        true
    }

    /// Abort an in-flight load. Finished results are left alone.
    pub fn cancel(&mut self) {
        let generation = &self.generation;
        let cancelled = self.state.send_if_modified(|s| {
            if s.is_loading() {
                // The worker checks the generation under this same lock.
                generation.fetch_add(1, Ordering::SeqCst);
                *s = LoaderState::Cancelled;
                true
            } else {
                false
            }
        });
        if cancelled {
            info!(url = %self.url, "Earthquake load cancelled");
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Abort any in-flight load and discard previous results.
    pub fn reset(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.state.send_replace(LoaderState::Idle);
        debug!(url = %self.url, "Loader reset");
    }

    /// Resolve once the state is no longer `Loading`.
    ///
    /// The returned future does not borrow the loader.
    pub fn ready(&self) -> impl Future<Output = LoaderState> + Send + 'static {
        let mut rx = self.state.subscribe();
        async move {
            match rx.wait_for(|s| !s.is_loading()).await {
                Ok(state) => state.clone(),
                Err(_) => LoaderState::Cancelled,
            }
        }
    }
}

impl Drop for EarthquakeLoader {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_QUAKE: &str =
        r#"{"features":[{"properties":{"mag":6.7,"place":"Fiji region","time":1,"url":"u"}}]}"#;

    async fn mock_feed(hits: usize) -> (mockito::ServerGuard, mockito::Mock, String) {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/query")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(ONE_QUAKE)
            .expect(hits)
            .create_async()
            .await;
        let url = format!("{}/query?format=geojson", server.url());
        (server, mock, url)
    }

    #[tokio::test]
    async fn test_start_delivers_result() {
        let (_server, mock, url) = mock_feed(1).await;
        let mut loader = EarthquakeLoader::new(UsgsClient::new().unwrap(), &url);

        assert_eq!(loader.state(), LoaderState::Idle);
        assert!(loader.start());
        assert!(loader.state().is_loading());

        let state = loader.ready().await;
        let outcome = state.outcome().unwrap();
        assert_eq!(outcome.earthquakes().len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_start_is_one_shot() {
        let (_server, mock, url) = mock_feed(1).await;
        let mut loader = EarthquakeLoader::new(UsgsClient::new().unwrap(), &url);

        assert!(loader.start());
        assert!(!loader.start());
        loader.ready().await;
        assert!(!loader.start());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_cancel_before_completion() {
        let (_server, _mock, url) = mock_feed(0).await;
        let mut loader = EarthquakeLoader::new(UsgsClient::new().unwrap(), &url);

        loader.start();
        loader.cancel();

        assert_eq!(loader.ready().await, LoaderState::Cancelled);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_sticks_after_worker_finishes() {
        let (_server, _mock, url) = mock_feed(1).await;
        let mut loader = EarthquakeLoader::new(UsgsClient::new().unwrap(), &url);

        for _ in 0..20 {
            loader.reset();
            loader.start();
            tokio::task::yield_now().await;
            loader.cancel();

            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            let state = loader.state();
            assert!(
                matches!(state, LoaderState::Cancelled | LoaderState::Ready(_)),
                "unexpected state {state:?}"
            );
            if state == LoaderState::Cancelled {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                assert_eq!(loader.state(), LoaderState::Cancelled);
            }
        }
    }

    #[tokio::test]
    async fn test_reset_discards_and_reloads() {
        let (_server, mock, url) = mock_feed(2).await;
        let mut loader = EarthquakeLoader::new(UsgsClient::new().unwrap(), &url);

        loader.start();
        loader.ready().await;

        loader.reset();
        assert_eq!(loader.state(), LoaderState::Idle);

        assert!(loader.start());
        let state = loader.ready().await;
        assert!(state.outcome().is_some());
        mock.assert_async().await;
    }
}
