//! HTTP API handlers for jukejury-web

pub mod error;
pub mod health;
pub mod leaderboard;
pub mod songs;
pub mod ui;
pub mod voting;

pub use error::ApiError;
pub use health::health_routes;
pub use leaderboard::get_leaderboard;
pub use songs::{add_song, delete_song, list_songs};
pub use ui::{serve_app_js, serve_index};
pub use voting::{get_pair, submit_vote};
