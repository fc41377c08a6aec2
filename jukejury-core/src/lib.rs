//! # JukeJury Core Library
//!
//! In-memory voting engine for pairwise song ranking:
//! - Song pool management (add/remove/list)
//! - Appearance-biased pair selection
//! - Vote recording and win-rate leaderboard
//!
//! This crate is the leaf of the system: it knows nothing about HTTP.
//! The `jukejury-web` transport wraps each engine operation 1:1.

pub mod engine;
pub mod error;

pub use engine::{SongStats, VotingEngine};
pub use error::{Error, Result};
