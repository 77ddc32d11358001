//! Deterministic simulation module
//!
//! All gameplay logic lives here. Every engine must be deterministic:
//! - Fixed timestep (one `tick` per frame) or virtual-time `advance`
//! - Seeded RNG only
//! - Stable iteration order (by entity id or row-major cell order)
//! - No rendering or platform dependencies

pub mod breakout;
pub mod collision;
pub mod color_memory;
pub mod flappy;
pub mod timeline;
pub mod word_search;

pub use breakout::{
    BreakoutConfig, BreakoutEngine, BreakoutInput, BreakoutSnapshot, BreakoutState,
};
pub use collision::Rect;
pub use color_memory::{
    Color, ColorMemoryConfig, ColorMemoryEngine, ColorMemorySnapshot, RoundPhase,
};
pub use flappy::{FlappyConfig, FlappyEngine, FlappySnapshot, FlappyState};
pub use timeline::{Timeline, TimerId};
pub use word_search::{
    Category, Cell, Direction, PlacedWord, Puzzle, WordSearchConfig, WordSearchEngine,
    WordSearchSnapshot,
};
