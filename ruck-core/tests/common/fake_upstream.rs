//! Scripted fake upstream for fetch and ingest integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random localhost port. Two
//! surfaces:
//! - `GET /feed` replays a scripted sequence of responses, one per request,
//!   repeating the last entry once the script is exhausted, and records the
//!   arrival instant of every hit so tests can assert retry pacing.
//! - Any other path serves a fixed response registered with [`route`],
//!   standing in for the summary/lineups/scoreboard endpoints.
//!
//! The client under test takes configurable base URLs, so pointing it here
//! needs no global state.
//!
//! [`route`]: FakeUpstream::route

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Default)]
struct UpstreamState {
    /// Status/body sequence for `/feed`, one entry per request.
    script: Vec<(u16, String)>,
    /// Fixed responses by exact path: status, content type, body.
    routes: HashMap<String, (u16, &'static str, String)>,
    /// Arrival instant of every `/feed` request.
    feed_hits: Vec<Instant>,
    /// Paths of all non-feed requests, in arrival order.
    route_paths: Vec<String>,
}

/// Handle to the running fake upstream.
pub struct FakeUpstream {
    addr: SocketAddr,
    state: Arc<Mutex<UpstreamState>>,
}

impl FakeUpstream {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(UpstreamState::default()));

        let app = Router::new()
            .route("/feed", get(serve_feed))
            .fallback(serve_route)
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL, e.g. `http://127.0.0.1:PORT`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of the scripted endpoint.
    pub fn feed_url(&self) -> String {
        format!("{}/feed", self.base_url())
    }

    /// Append one step to the `/feed` script.
    pub async fn script(&self, status: u16, body: &str) {
        let mut state = self.state.lock().await;
        state.script.push((status, body.to_string()));
    }

    /// Register a fixed response for an exact path.
    pub async fn route(&self, path: &str, status: u16, content_type: &'static str, body: &str) {
        let mut state = self.state.lock().await;
        state
            .routes
            .insert(path.to_string(), (status, content_type, body.to_string()));
    }

    /// Arrival instants of the `/feed` requests seen so far.
    pub async fn feed_hits(&self) -> Vec<Instant> {
        self.state.lock().await.feed_hits.clone()
    }

    /// Paths of the non-feed requests seen so far, in arrival order.
    pub async fn route_paths(&self) -> Vec<String> {
        self.state.lock().await.route_paths.clone()
    }
}

async fn serve_feed(State(state): State<Arc<Mutex<UpstreamState>>>) -> Response {
    let mut state = state.lock().await;

    // The last script entry repeats so budget-exhaustion tests can script
    // a single failing step.
    let index = state.feed_hits.len().min(state.script.len().saturating_sub(1));
    state.feed_hits.push(Instant::now());

    match state.script.get(index) {
        Some((status, body)) => {
            (StatusCode::from_u16(*status).unwrap(), body.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, String::new()).into_response(),
    }
}

async fn serve_route(State(state): State<Arc<Mutex<UpstreamState>>>, uri: Uri) -> Response {
    let mut state = state.lock().await;
    state.route_paths.push(uri.path().to_string());

    match state.routes.get(uri.path()) {
        Some((status, content_type, body)) => (
            StatusCode::from_u16(*status).unwrap(),
            [(header::CONTENT_TYPE, *content_type)],
            body.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, String::new()).into_response(),
    }
}
