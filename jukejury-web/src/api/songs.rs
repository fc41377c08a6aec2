//! Song pool management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::ApiError;
use crate::AppState;

/// Longest accepted song name, in characters
const MAX_NAME_CHARS: usize = 200;

/// Body for POST /api/songs
#[derive(Debug, Deserialize)]
pub struct AddSongRequest {
    pub name: String,
}

/// One song with its current stats
#[derive(Debug, Serialize)]
pub struct SongRow {
    pub name: String,
    pub appearances: u64,
    pub wins: u64,
    #[serde(rename = "winRate")]
    pub win_rate: f64,
}

impl SongRow {
    pub(crate) fn new(name: String, stats: jukejury_core::SongStats) -> Self {
        Self {
            name,
            appearances: stats.appearances,
            wins: stats.wins,
            win_rate: stats.win_rate(),
        }
    }
}

/// Plain acknowledgment body
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub ok: bool,
}

/// GET /api/songs
///
/// Lists the pool in insertion order with per-song stats. A song
/// removed between the pool snapshot and its stats lookup is skipped
/// rather than reported with stale numbers.
pub async fn list_songs(State(state): State<AppState>) -> Json<Vec<SongRow>> {
    let rows = state
        .engine
        .list_songs()
        .into_iter()
        .filter_map(|name| {
            let stats = state.engine.stats(&name)?;
            Some(SongRow::new(name, stats))
        })
        .collect();

    Json(rows)
}

/// POST /api/songs
///
/// Adds a song to the pool. Returns 201 on success, 400 when the name
/// is blank, a duplicate, or over the length cap.
pub async fn add_song(
    State(state): State<AppState>,
    Json(req): Json<AddSongRequest>,
) -> Result<(StatusCode, Json<AckResponse>), ApiError> {
    if req.name.chars().count() > MAX_NAME_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Song name too long (max {} characters)",
            MAX_NAME_CHARS
        )));
    }

    if !state.engine.add_song(&req.name) {
        return Err(ApiError::BadRequest(
            "Song exists or invalid name".to_string(),
        ));
    }

    info!("Add song request accepted: {:?}", req.name.trim());
    Ok((StatusCode::CREATED, Json(AckResponse { ok: true })))
}

/// DELETE /api/songs/:name
///
/// Removes a song and its stats. 404 when the song is not in the pool.
pub async fn delete_song(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AckResponse>, ApiError> {
    if !state.engine.remove_song(&name) {
        return Err(ApiError::NotFound("Song not found".to_string()));
    }

    info!("Delete song request accepted: {:?}", name.trim());
    Ok(Json(AckResponse { ok: true }))
}
