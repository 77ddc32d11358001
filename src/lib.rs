//! Calm Arcade - therapeutic mini-game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulations (breakout, flappy, word search, color memory)
//! - `session`: Shared Idle -> Playing -> Ended lifecycle and the result record
//! - `report`: Exactly-once delivery of results to the host
//! - `settings`: Per-game configuration presets
//! - `stats`: In-memory result history and leaderboards

pub mod clock;
pub mod engine;
pub mod report;
pub mod rng;
pub mod session;
pub mod settings;
pub mod sim;
pub mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::MiniGame;
pub use report::{Reporter, ResultSink};
pub use rng::RandomSource;
pub use session::{GameKind, GameResult, Session, SessionPhase};
pub use settings::{Settings, SettingsError};
pub use stats::{GameStats, ResultHistory};

/// Shared canvas constants
pub mod consts {
    /// Logical canvas width used by the frame-tick games
    pub const CANVAS_WIDTH: f32 = 800.0;
    /// Logical canvas height used by the frame-tick games
    pub const CANVAS_HEIGHT: f32 = 600.0;
}
