//! Leaderboard endpoint

use axum::{extract::State, Json};

use crate::api::songs::SongRow;
use crate::AppState;

/// GET /api/leaderboard
///
/// Every song with its stats, ordered by win rate descending. Ties
/// break by wins descending, then appearances ascending, then name.
pub async fn get_leaderboard(State(state): State<AppState>) -> Json<Vec<SongRow>> {
    let rows = state
        .engine
        .leaderboard()
        .into_iter()
        .map(|(name, stats)| SongRow::new(name, stats))
        .collect();

    Json(rows)
}
