//! Thread-safe, in-memory voting engine
//!
//! Holds the song pool and per-song vote counters behind a single
//! exclusive lock. Every public operation takes the lock for its full
//! duration, so effects are totally ordered and no caller ever sees a
//! half-applied update. Operations do only in-memory work while locked;
//! the pool is expected to stay small (tens of songs), so contention is
//! negligible.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use rand::distributions::{Distribution, WeightedIndex};
use tracing::debug;

use crate::error::{Error, Result};

/// Per-song vote counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SongStats {
    /// Times the song was part of a recorded vote, win or lose
    pub appearances: u64,
    /// Times the song was the selected side of a recorded vote
    pub wins: u64,
}

impl SongStats {
    /// Fraction of appearances won; 0.0 for a song never offered
    pub fn win_rate(&self) -> f64 {
        if self.appearances == 0 {
            return 0.0;
        }
        self.wins as f64 / self.appearances as f64
    }
}

/// Pool membership and stats, always mutated together under the lock.
/// The pool keeps insertion order for stable listings; the stats map
/// holds exactly the same names as keys.
#[derive(Default)]
struct PoolState {
    pool: Vec<String>,
    stats: HashMap<String, SongStats>,
}

/// Thread-safe voting engine over an in-memory song pool.
///
/// Construct one instance and share it (e.g. in an `Arc`) across
/// request handlers; there is no ambient singleton. All name arguments
/// are whitespace-trimmed before use and compared case-sensitively.
pub struct VotingEngine {
    inner: Mutex<PoolState>,
}

impl VotingEngine {
    /// Create an engine with an empty pool
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(PoolState::default()),
        }
    }

    /// Add a song to the pool with zeroed stats.
    ///
    /// Returns `false` if the trimmed name is empty or already present;
    /// duplicates are an expected case, not an error.
    pub fn add_song(&self, name: &str) -> bool {
        let normalized = name.trim();
        if normalized.is_empty() {
            return false;
        }
        let mut inner = self.inner.lock().unwrap();
        if inner.stats.contains_key(normalized) {
            return false;
        }
        inner.pool.push(normalized.to_string());
        inner.stats.insert(normalized.to_string(), SongStats::default());
        debug!("Added song {:?} to pool", normalized);
        true
    }

    /// Remove a song and its stats together.
    ///
    /// Returns `false` if the song is not in the pool. Removal is
    /// non-reversible; re-adding the song starts from zeroed stats.
    pub fn remove_song(&self, name: &str) -> bool {
        let normalized = name.trim();
        let mut inner = self.inner.lock().unwrap();
        match inner.pool.iter().position(|s| s == normalized) {
            Some(idx) => {
                inner.pool.remove(idx);
                inner.stats.remove(normalized);
                debug!("Removed song {:?} from pool", normalized);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the pool in insertion order
    pub fn list_songs(&self) -> Vec<String> {
        self.inner.lock().unwrap().pool.clone()
    }

    /// Stats for one song, or `None` if it is not in the pool
    pub fn stats(&self, name: &str) -> Option<SongStats> {
        self.inner.lock().unwrap().stats.get(name.trim()).copied()
    }

    /// Pick two distinct songs to offer for a vote.
    ///
    /// Sampling is weighted toward songs with fewer appearances: each
    /// song weighs `max_appearances - appearances + 1`, never below 1,
    /// so every song keeps a nonzero chance. The pair comes from two
    /// sequential single draws: the first song is removed from the
    /// candidate set before the second draw, which therefore sees the
    /// reduced weight distribution.
    pub fn choose_pair(&self) -> Result<(String, String)> {
        let inner = self.inner.lock().unwrap();
        if inner.pool.len() < 2 {
            return Err(Error::InvalidState(
                "need at least 2 songs in the pool".to_string(),
            ));
        }

        let max_appearances = inner
            .stats
            .values()
            .map(|s| s.appearances)
            .max()
            .unwrap_or(0);
        let mut candidates = inner.pool.clone();
        let mut weights: Vec<u64> = candidates
            .iter()
            .map(|name| {
                let appearances = inner.stats[name.as_str()].appearances;
                max_appearances.saturating_sub(appearances) + 1
            })
            .collect();

        let mut rng = rand::thread_rng();

        let first_draw = WeightedIndex::new(&weights)
            .expect("pool has >= 2 candidates with weights >= 1");
        let first_idx = first_draw.sample(&mut rng);
        let first = candidates.remove(first_idx);
        weights.remove(first_idx);

        let second_draw = WeightedIndex::new(&weights)
            .expect("one candidate removed, at least one remains with weight >= 1");
        let second = candidates.swap_remove(second_draw.sample(&mut rng));

        debug!("Offering pair {:?} vs {:?}", first, second);
        Ok((first, second))
    }

    /// Record the outcome of a presented pair: `selected` beat `other`.
    ///
    /// Both songs gain an appearance; only `selected` gains a win.
    /// Fails without touching any counter if the two names are equal
    /// after trimming or if either is absent from the pool.
    pub fn record_vote(&self, selected: &str, other: &str) -> Result<()> {
        let selected = selected.trim();
        let other = other.trim();
        if selected == other {
            return Err(Error::InvalidInput(
                "selected and other name the same song".to_string(),
            ));
        }
        let mut inner = self.inner.lock().unwrap();
        // Validate both sides before touching either, so a failed vote
        // never leaves a half-applied increment.
        if !inner.stats.contains_key(selected) || !inner.stats.contains_key(other) {
            return Err(Error::NotFound(
                "one or both songs missing from pool".to_string(),
            ));
        }
        if let Some(stats) = inner.stats.get_mut(selected) {
            stats.appearances += 1;
            stats.wins += 1;
        }
        if let Some(stats) = inner.stats.get_mut(other) {
            stats.appearances += 1;
        }
        debug!("Recorded vote: {:?} over {:?}", selected, other);
        Ok(())
    }

    /// Ranked snapshot of every song with its stats.
    ///
    /// Ordered by win rate descending, then wins descending, then
    /// appearances ascending, then name ascending. Names are unique,
    /// so the order is a deterministic total order.
    pub fn leaderboard(&self) -> Vec<(String, SongStats)> {
        // Snapshot under the lock, order outside it.
        let mut rows: Vec<(String, SongStats)> = {
            let inner = self.inner.lock().unwrap();
            inner
                .stats
                .iter()
                .map(|(name, stats)| (name.clone(), *stats))
                .collect()
        };
        rows.sort_by(leaderboard_order);
        rows
    }
}

impl Default for VotingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Total order for leaderboard rows.
///
/// Win rates are compared in millionths (rounded) so floating-point
/// jitter cannot reorder near-ties.
fn leaderboard_order(a: &(String, SongStats), b: &(String, SongStats)) -> Ordering {
    rounded_win_rate(&b.1)
        .cmp(&rounded_win_rate(&a.1))
        .then_with(|| b.1.wins.cmp(&a.1.wins))
        .then_with(|| a.1.appearances.cmp(&b.1.appearances))
        .then_with(|| a.0.cmp(&b.0))
}

/// Win rate scaled to millionths; `win_rate` is in [0, 1] because wins
/// never exceed appearances.
fn rounded_win_rate(stats: &SongStats) -> u64 {
    (stats.win_rate() * 1_000_000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_of(engine: &VotingEngine, name: &str) -> SongStats {
        engine.stats(name).expect("song should be in pool")
    }

    #[test]
    fn test_add_song_trims_and_rejects_blank() {
        let engine = VotingEngine::new();

        assert!(!engine.add_song(""));
        assert!(!engine.add_song("   "));
        assert!(engine.list_songs().is_empty());

        assert!(engine.add_song("  Foo  "));
        assert_eq!(engine.list_songs(), vec!["Foo".to_string()]);

        // Any whitespace dressing of an existing name is a duplicate
        assert!(!engine.add_song("Foo"));
        assert!(!engine.add_song(" Foo "));
        assert_eq!(engine.list_songs(), vec!["Foo".to_string()]);
    }

    #[test]
    fn test_add_song_is_case_sensitive() {
        let engine = VotingEngine::new();

        assert!(engine.add_song("Foo"));
        assert!(engine.add_song("foo"));
        assert_eq!(engine.list_songs().len(), 2);
    }

    #[test]
    fn test_list_songs_keeps_insertion_order() {
        let engine = VotingEngine::new();

        engine.add_song("Charlie");
        engine.add_song("Alpha");
        engine.add_song("Bravo");

        assert_eq!(
            engine.list_songs(),
            vec![
                "Charlie".to_string(),
                "Alpha".to_string(),
                "Bravo".to_string()
            ]
        );
    }

    #[test]
    fn test_new_song_starts_with_zeroed_stats() {
        let engine = VotingEngine::new();

        engine.add_song("Foo");
        let stats = stats_of(&engine, "Foo");
        assert_eq!(stats.appearances, 0);
        assert_eq!(stats.wins, 0);
        assert_eq!(stats.win_rate(), 0.0);
    }

    #[test]
    fn test_record_vote_updates_both_sides() {
        let engine = VotingEngine::new();
        engine.add_song("A");
        engine.add_song("B");

        engine.record_vote("A", "B").unwrap();

        assert_eq!(stats_of(&engine, "A"), SongStats { appearances: 1, wins: 1 });
        assert_eq!(stats_of(&engine, "B"), SongStats { appearances: 1, wins: 0 });

        engine.record_vote("B", "A").unwrap();

        assert_eq!(stats_of(&engine, "A"), SongStats { appearances: 2, wins: 1 });
        assert_eq!(stats_of(&engine, "B"), SongStats { appearances: 2, wins: 1 });
    }

    #[test]
    fn test_record_vote_normalizes_names() {
        let engine = VotingEngine::new();
        engine.add_song("A");
        engine.add_song("B");

        engine.record_vote("  A ", "B  ").unwrap();

        assert_eq!(stats_of(&engine, "A").wins, 1);
        assert_eq!(stats_of(&engine, "B").appearances, 1);
    }

    #[test]
    fn test_record_vote_rejects_identical_songs() {
        let engine = VotingEngine::new();
        engine.add_song("A");

        let err = engine.record_vote("A", " A ").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        // No partial effect
        assert_eq!(stats_of(&engine, "A"), SongStats::default());
    }

    #[test]
    fn test_record_vote_rejects_unknown_songs() {
        let engine = VotingEngine::new();
        engine.add_song("A");

        let err = engine.record_vote("A", "Nope").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = engine.record_vote("Nope", "A").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        // The known side must not have been incremented
        assert_eq!(stats_of(&engine, "A"), SongStats::default());
    }

    #[test]
    fn test_wins_never_exceed_appearances() {
        let engine = VotingEngine::new();
        engine.add_song("A");
        engine.add_song("B");
        engine.add_song("C");

        for _ in 0..10 {
            engine.record_vote("A", "B").unwrap();
            engine.record_vote("B", "C").unwrap();
            engine.record_vote("C", "A").unwrap();
        }

        for (_, stats) in engine.leaderboard() {
            assert!(stats.wins <= stats.appearances);
        }
    }

    #[test]
    fn test_choose_pair_needs_two_songs() {
        let engine = VotingEngine::new();

        let err = engine.choose_pair().unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));

        engine.add_song("Solo");
        let err = engine.choose_pair().unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_choose_pair_returns_distinct_pool_members() {
        let engine = VotingEngine::new();
        engine.add_song("A");
        engine.add_song("B");
        engine.add_song("C");

        let pool = engine.list_songs();
        for _ in 0..50 {
            let (first, second) = engine.choose_pair().unwrap();
            assert_ne!(first, second);
            assert!(pool.contains(&first));
            assert!(pool.contains(&second));
        }
    }

    #[test]
    fn test_choose_pair_works_with_exactly_two_songs() {
        let engine = VotingEngine::new();
        engine.add_song("A");
        engine.add_song("B");

        let (first, second) = engine.choose_pair().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_remove_song_deletes_stats() {
        let engine = VotingEngine::new();
        engine.add_song("A");
        engine.add_song("B");
        engine.record_vote("A", "B").unwrap();

        assert!(engine.remove_song("A"));
        assert!(engine.stats("A").is_none());
        assert!(!engine.list_songs().contains(&"A".to_string()));
        assert!(engine.leaderboard().iter().all(|(name, _)| name != "A"));

        // Re-adding starts over from zero
        assert!(engine.add_song("A"));
        assert_eq!(stats_of(&engine, "A"), SongStats::default());
    }

    #[test]
    fn test_remove_song_unknown_returns_false() {
        let engine = VotingEngine::new();
        engine.add_song("A");

        assert!(!engine.remove_song("B"));
        assert_eq!(engine.list_songs().len(), 1);
    }

    #[test]
    fn test_pool_and_stats_stay_aligned() {
        let engine = VotingEngine::new();

        engine.add_song("A");
        engine.add_song("B");
        engine.add_song("A"); // duplicate, rejected
        engine.remove_song("A");
        engine.add_song("C");
        engine.add_song("A"); // back in, fresh stats
        engine.remove_song("missing");

        let pool = engine.list_songs();
        let mut deduped = pool.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), pool.len(), "pool must not hold duplicates");

        for name in &pool {
            assert!(engine.stats(name).is_some(), "{name} has no stats record");
        }
        assert_eq!(engine.leaderboard().len(), pool.len());
    }

    #[test]
    fn test_leaderboard_ordering_rules() {
        // A: rate 1.0 on 3 appearances; B: rate 0.75; C: rate 1.0 on
        // fewer wins. Expected order A, C, B: rate first, wins break
        // the 1.0 tie.
        let mut rows = vec![
            ("B".to_string(), SongStats { appearances: 4, wins: 3 }),
            ("C".to_string(), SongStats { appearances: 2, wins: 2 }),
            ("A".to_string(), SongStats { appearances: 3, wins: 3 }),
        ];
        rows.sort_by(leaderboard_order);

        let names: Vec<&str> = rows.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_leaderboard_appearances_break_win_ties() {
        // Same rate and wins: fewer appearances ranks higher
        let mut rows = vec![
            ("Y".to_string(), SongStats { appearances: 5, wins: 0 }),
            ("X".to_string(), SongStats { appearances: 2, wins: 0 }),
        ];
        rows.sort_by(leaderboard_order);
        assert_eq!(rows[0].0, "X");
    }

    #[test]
    fn test_leaderboard_name_tiebreak_is_ascending() {
        let engine = VotingEngine::new();
        engine.add_song("banana");
        engine.add_song("apple");
        engine.add_song("cherry");

        let names: Vec<String> = engine
            .leaderboard()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "apple".to_string(),
                "banana".to_string(),
                "cherry".to_string()
            ]
        );
    }

    #[test]
    fn test_leaderboard_reflects_recorded_votes() {
        let engine = VotingEngine::new();
        engine.add_song("X");
        engine.add_song("Y");
        engine.add_song("Z");

        engine.record_vote("X", "Y").unwrap();
        engine.record_vote("X", "Z").unwrap();
        engine.record_vote("Y", "Z").unwrap();

        let rows = engine.leaderboard();
        let names: Vec<&str> = rows.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["X", "Y", "Z"]);

        assert_eq!(rows[0].1.win_rate(), 1.0);
        assert_eq!(rows[1].1.win_rate(), 0.5);
        assert_eq!(rows[2].1.win_rate(), 0.0);
    }

    #[test]
    fn test_win_rate_zero_when_never_offered() {
        let stats = SongStats::default();
        assert_eq!(stats.win_rate(), 0.0);

        let stats = SongStats { appearances: 4, wins: 1 };
        assert_eq!(stats.win_rate(), 0.25);
    }
}
