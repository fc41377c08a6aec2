//! jukejury-web library - HTTP transport for the voting engine
//!
//! Thin JSON layer over `jukejury_core::VotingEngine`: every endpoint
//! maps to exactly one engine operation, plus the embedded browser UI
//! and a health check. The transport holds no voting state of its own.

use std::sync::Arc;

use axum::Router;
use jukejury_core::VotingEngine;
use tower_http::cors::CorsLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The voting engine; the only stateful component in the process
    pub engine: Arc<VotingEngine>,
}

impl AppState {
    /// Create new application state
    pub fn new(engine: Arc<VotingEngine>) -> Self {
        Self { engine }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/songs", get(api::list_songs))
        .route("/api/songs", post(api::add_song))
        .route("/api/songs/:name", delete(api::delete_song))
        .route("/api/pair", get(api::get_pair))
        .route("/api/vote", post(api::submit_vote))
        .route("/api/leaderboard", get(api::get_leaderboard))
        .merge(api::health_routes())
        .with_state(state)
        // Permissive CORS: anyone on the network may vote from a browser
        .layer(CorsLayer::permissive())
}
