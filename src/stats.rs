//! Result history and leaderboards
//!
//! An in-memory [`ResultSink`] that keeps every finished session and answers
//! the hub screen's questions: per-game totals, progress, and a top-10 board.
//! Serialises to JSON; storing that JSON is up to the host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::report::ResultSink;
use crate::session::{GameKind, GameResult};
use crate::settings::SettingsError;

/// Maximum number of entries kept per leaderboard
pub const MAX_LEADERBOARD_ENTRIES: usize = 10;
/// Sessions needed for a game to count as fully practised
pub const PROGRESS_TARGET: u32 = 10;
/// Sessions per practice level
pub const SESSIONS_PER_LEVEL: u32 = 5;

/// A single leaderboard entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub score: u32,
    pub time_played_ms: u64,
    pub completed: bool,
}

/// Top scores for one game, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_LEADERBOARD_ENTRIES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a result if it qualifies. Returns the rank achieved.
    pub fn add(&mut self, result: &GameResult) -> Option<usize> {
        let rank = self.potential_rank(result.score)?;
        self.entries.insert(
            rank - 1,
            LeaderboardEntry {
                score: result.score,
                time_played_ms: result.time_played_ms,
                completed: result.completed,
            },
        );
        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

/// Aggregate numbers for one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub total_played: u32,
    pub total_score: u64,
    pub total_time_ms: u64,
    pub completed: u32,
    pub best_score: u32,
}

impl GameStats {
    /// Played sessions towards [`PROGRESS_TARGET`], capped at 100
    pub fn progress_percent(&self) -> f32 {
        (self.total_played as f32 * 100.0 / PROGRESS_TARGET as f32).min(100.0)
    }

    /// Practice level: one level per [`SESSIONS_PER_LEVEL`] sessions, starting at 1
    pub fn level(&self) -> u32 {
        self.total_played / SESSIONS_PER_LEVEL + 1
    }

    /// Total time rounded to whole minutes
    pub fn total_minutes(&self) -> u64 {
        (self.total_time_ms + 30_000) / 60_000
    }
}

/// Every result seen so far, plus per-game leaderboards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultHistory {
    results: Vec<GameResult>,
    leaderboards: BTreeMap<GameKind, Leaderboard>,
}

impl ResultHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished session. Returns the leaderboard rank, if any.
    pub fn record(&mut self, result: &GameResult) -> Option<usize> {
        self.results.push(*result);
        let rank = self.leaderboards.entry(result.game_type).or_default().add(result);
        if let Some(rank) = rank {
            log::debug!("{} score {} ranked #{}", result.game_type.as_str(), result.score, rank);
        }
        rank
    }

    pub fn results(&self) -> &[GameResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn stats(&self, kind: GameKind) -> GameStats {
        self.results
            .iter()
            .filter(|r| r.game_type == kind)
            .fold(GameStats::default(), |mut acc, r| {
                acc.total_played += 1;
                acc.total_score += u64::from(r.score);
                acc.total_time_ms += r.time_played_ms;
                acc.completed += u32::from(r.completed);
                acc.best_score = acc.best_score.max(r.score);
                acc
            })
    }

    pub fn progress_percent(&self, kind: GameKind) -> f32 {
        self.stats(kind).progress_percent()
    }

    /// Leaderboard for a game (empty if never played)
    pub fn leaderboard(&self, kind: GameKind) -> Leaderboard {
        self.leaderboards.get(&kind).cloned().unwrap_or_default()
    }

    pub fn qualifies(&self, kind: GameKind, score: u32) -> bool {
        self.leaderboards
            .get(&kind)
            .map_or(score > 0, |board| board.qualifies(score))
    }

    pub fn potential_rank(&self, kind: GameKind, score: u32) -> Option<usize> {
        match self.leaderboards.get(&kind) {
            Some(board) => board.potential_rank(score),
            None => Leaderboard::new().potential_rank(score),
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ResultSink for ResultHistory {
    fn on_end(&mut self, result: &GameResult) {
        self.record(result);
    }
}
