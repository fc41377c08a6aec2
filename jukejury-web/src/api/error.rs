//! Client-facing API errors
//!
//! Every error carries the exact message the browser front-end shows,
//! serialized as `{"error": message}`. Engine errors keep their own
//! Display strings for the logs; the `From` impl below substitutes the
//! client wording.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API errors
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
}

impl From<jukejury_core::Error> for ApiError {
    fn from(err: jukejury_core::Error) -> Self {
        // Each engine error kind arises from exactly one operation, so
        // the client message can be fixed per kind.
        match err {
            jukejury_core::Error::InvalidInput(_) => {
                ApiError::BadRequest("Songs must be distinct".to_string())
            }
            jukejury_core::Error::NotFound(_) => {
                ApiError::BadRequest("One or both songs not found in pool".to_string())
            }
            jukejury_core::Error::InvalidState(_) => {
                ApiError::BadRequest("Need at least 2 songs to vote".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
