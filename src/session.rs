//! Session lifecycle shared by every mini-game
//!
//! `Idle -> Playing -> Ended`, with `reset` forcing any phase back to `Idle`.
//! A session produces exactly one [`GameResult`], at the moment it ends.

use serde::{Deserialize, Serialize};

/// Which mini-game produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Breakout,
    WordSearch,
    FlappyBird,
    ColorMemory,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::Breakout,
        GameKind::WordSearch,
        GameKind::FlappyBird,
        GameKind::ColorMemory,
    ];

    /// Stable identifier used by collaborators that store results
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Breakout => "breakout",
            GameKind::WordSearch => "wordsearch",
            GameKind::FlappyBird => "flappybird",
            GameKind::ColorMemory => "colormemory",
        }
    }
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Idle,
    Playing,
    Ended,
}

/// Final record of one play-through, handed to the host exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub game_type: GameKind,
    pub score: u32,
    pub time_played_ms: u64,
    pub completed: bool,
}

/// One play-through's bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub phase: SessionPhase,
    /// Never decreases while `Playing`
    pub score: u32,
    /// Clock reading when `start` was called
    pub started_at_ms: u64,
    /// Game-specific win flag, fixed when the session ends
    pub completed: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh session, discarding any previous one
    pub fn start(&mut self, now_ms: u64) {
        *self = Self {
            phase: SessionPhase::Playing,
            score: 0,
            started_at_ms: now_ms,
            completed: false,
        };
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    /// Add points (ignored unless playing)
    pub fn add_score(&mut self, points: u32) {
        if self.is_playing() {
            self.score = self.score.saturating_add(points);
        }
    }

    /// Transition to `Ended` and build the result.
    ///
    /// Returns `None` if the session is not playing; ending twice is a logic
    /// error in the calling engine.
    pub fn finish(&mut self, kind: GameKind, completed: bool, now_ms: u64) -> Option<GameResult> {
        if !self.is_playing() {
            log::error!(
                "{} session finished from {:?}; result suppressed",
                kind.as_str(),
                self.phase
            );
            debug_assert!(false, "session finished while not playing");
            return None;
        }

        self.phase = SessionPhase::Ended;
        self.completed = completed;
        Some(GameResult {
            game_type: kind,
            score: self.score,
            time_played_ms: now_ms.saturating_sub(self.started_at_ms),
            completed,
        })
    }

    /// Back to `Idle`
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
