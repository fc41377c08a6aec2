//! Pair selection and vote recording endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::songs::AckResponse;
use crate::AppState;

/// Body for POST /api/vote
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// The song the voter picked
    pub selected: String,
    /// The song it was matched against
    pub other: String,
}

/// GET /api/pair
///
/// Proposes two distinct songs as a two-element array in draw order.
/// Requesting a pair does not change any stats; only a vote does.
pub async fn get_pair(State(state): State<AppState>) -> Result<Json<(String, String)>, ApiError> {
    let pair = state.engine.choose_pair()?;
    Ok(Json(pair))
}

/// POST /api/vote
///
/// Records that `selected` won its matchup against `other`.
pub async fn submit_vote(
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    debug!("Vote request: {:?} over {:?}", req.selected, req.other);
    state.engine.record_vote(&req.selected, &req.other)?;
    Ok(Json(AckResponse { ok: true }))
}
