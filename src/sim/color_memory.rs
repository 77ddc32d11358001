//! Sequence-recall memory game
//!
//! Each round appends one random color and plays the whole sequence back on a
//! [`Timeline`]: for every element an off gap, then the color lit for
//! `show_ms`. After the last element and a short settle the player gets
//! control. Clicks are only accepted in the `Input` sub-phase.
//!
//! Every playback step, the click flash, and the pause between rounds are
//! timeline events. `reset`, `start`, and the end of a session cancel the
//! whole timeline, so nothing from an old chain can fire into a new one.

use serde::{Deserialize, Serialize};

use super::timeline::{Timeline, TimerId};
use crate::clock::{Clock, SystemClock};
use crate::engine::MiniGame;
use crate::report::{Reporter, ResultSink};
use crate::rng::RandomSource;
use crate::session::{GameKind, GameResult, Session, SessionPhase};

pub const ROUND_POINTS: u32 = 10;

/// Button palette, in index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Cyan,
    Purple,
    Pink,
    Green,
    Orange,
    Red,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Cyan,
        Color::Purple,
        Color::Pink,
        Color::Green,
        Color::Orange,
        Color::Red,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Color> {
        Color::ALL.get(index).copied()
    }

    /// Display color as 0xRRGGBB
    pub fn rgb(&self) -> u32 {
        match self {
            Color::Cyan => 0x2dd4bf,
            Color::Purple => 0x8b5cf6,
            Color::Pink => 0xec4899,
            Color::Green => 0x10b981,
            Color::Orange => 0xf59e0b,
            Color::Red => 0xef4444,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorMemoryConfig {
    /// Rounds needed to win
    pub win_length: usize,
    /// How many palette colors are in play (1..=6)
    pub palette_size: usize,
    /// Off gap before each element
    pub lead_in_ms: u64,
    pub show_ms: u64,
    /// Pause after the last element before input opens
    pub settle_ms: u64,
    /// Pause after a completed round
    pub next_round_ms: u64,
    pub flash_ms: u64,
}

impl Default for ColorMemoryConfig {
    fn default() -> Self {
        Self {
            win_length: 10,
            palette_size: Color::ALL.len(),
            lead_in_ms: 600,
            show_ms: 400,
            settle_ms: 300,
            next_round_ms: 1000,
            flash_ms: 200,
        }
    }
}

/// What the player is allowed to do right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Sequence playback, clicks ignored
    #[default]
    Showing,
    /// Waiting for clicks
    Input,
    /// Round complete, next color pending
    Waiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaybackStep {
    Show(usize),
    Hide(usize),
    OpenInput,
    ClearFlash,
    NextRound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMemorySnapshot {
    pub phase: SessionPhase,
    pub round_phase: RoundPhase,
    pub score: u32,
    pub sequence: Vec<Color>,
    pub player_input: Vec<Color>,
    /// Highlighted button, from playback or a click flash
    pub active: Option<Color>,
    /// Element currently being played back
    pub showing_index: usize,
    pub round: usize,
}

pub struct ColorMemoryEngine {
    config: ColorMemoryConfig,
    sequence: Vec<Color>,
    player_input: Vec<Color>,
    round_phase: RoundPhase,
    active: Option<Color>,
    showing_index: usize,
    timeline: Timeline<PlaybackStep>,
    /// Pending clear for the latest click flash
    flash: Option<TimerId>,
    session: Session,
    reporter: Reporter,
    clock: Box<dyn Clock>,
    rng: RandomSource,
}

impl ColorMemoryEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_clock(seed, SystemClock::new())
    }

    pub fn with_clock(seed: u64, clock: impl Clock + 'static) -> Self {
        Self {
            config: ColorMemoryConfig::default(),
            sequence: Vec::new(),
            player_input: Vec::new(),
            round_phase: RoundPhase::default(),
            active: None,
            showing_index: 0,
            timeline: Timeline::new(),
            flash: None,
            session: Session::new(),
            reporter: Reporter::new(),
            clock: Box::new(clock),
            rng: RandomSource::new(seed),
        }
    }

    pub fn round_phase(&self) -> RoundPhase {
        self.round_phase
    }

    pub fn sequence(&self) -> &[Color] {
        &self.sequence
    }

    /// Pending playback/flash events
    pub fn pending_events(&self) -> usize {
        self.timeline.pending_len()
    }

    /// Advance the playback clock by `dt_ms`, firing everything that comes due
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.timeline.now_ms().saturating_add(dt_ms);
        while let Some(step) = self.timeline.pop_due(until) {
            self.apply(step);
        }
        self.timeline.settle(until);
    }

    /// Player pressed `color`. Ignored outside the input sub-phase.
    pub fn click(&mut self, color: Color) {
        if !self.session.is_playing() || self.round_phase != RoundPhase::Input {
            return;
        }

        // A new flash restarts the clear timer
        if let Some(previous) = self.flash.take() {
            self.timeline.cancel(previous);
        }
        self.active = Some(color);
        self.flash = Some(self.timeline.schedule(self.config.flash_ms, PlaybackStep::ClearFlash));

        let expected = self.sequence.get(self.player_input.len()).copied();
        self.player_input.push(color);

        if expected != Some(color) {
            let rounds_cleared = self.sequence.len().saturating_sub(1);
            log::debug!(
                "color memory: miss at {}/{} (wanted {:?}, got {:?})",
                self.player_input.len(),
                self.sequence.len(),
                expected,
                color
            );
            self.end(rounds_cleared >= self.config.win_length);
            return;
        }

        if self.player_input.len() == self.sequence.len() {
            let round = self.sequence.len();
            self.session.add_score(round as u32 * ROUND_POINTS);
            self.player_input.clear();
            log::debug!("color memory: round {} cleared", round);

            if round >= self.config.win_length {
                self.end(true);
                return;
            }
            self.round_phase = RoundPhase::Waiting;
            self.timeline.schedule(self.config.next_round_ms, PlaybackStep::NextRound);
        }
    }

    /// The button a perfect player would press next
    pub fn autopilot_choice(&self) -> Option<Color> {
        if self.round_phase != RoundPhase::Input || !self.session.is_playing() {
            return None;
        }
        self.sequence.get(self.player_input.len()).copied()
    }

    fn apply(&mut self, step: PlaybackStep) {
        match step {
            PlaybackStep::Show(i) => {
                self.active = self.sequence.get(i).copied();
                self.showing_index = i;
                self.timeline.schedule(self.config.show_ms, PlaybackStep::Hide(i));
            }
            PlaybackStep::Hide(i) => {
                self.active = None;
                if i + 1 < self.sequence.len() {
                    self.timeline.schedule(self.config.lead_in_ms, PlaybackStep::Show(i + 1));
                } else {
                    self.timeline.schedule(self.config.settle_ms, PlaybackStep::OpenInput);
                }
            }
            PlaybackStep::OpenInput => {
                self.round_phase = RoundPhase::Input;
            }
            PlaybackStep::ClearFlash => {
                self.flash = None;
                if self.round_phase != RoundPhase::Showing {
                    self.active = None;
                }
            }
            PlaybackStep::NextRound => self.next_round(),
        }
    }

    fn next_round(&mut self) {
        let palette = self.config.palette_size.clamp(1, Color::ALL.len());
        let color = Color::ALL[self.rng.index(palette)];
        self.sequence.push(color);
        self.player_input.clear();
        self.round_phase = RoundPhase::Showing;
        self.active = None;
        self.showing_index = 0;
        self.timeline.schedule(self.config.lead_in_ms, PlaybackStep::Show(0));
    }

    fn end(&mut self, completed: bool) {
        self.timeline.cancel_all();
        self.flash = None;
        self.active = None;
        let now = self.clock.now_ms();
        if let Some(result) = self.session.finish(GameKind::ColorMemory, completed, now) {
            self.reporter.emit(result);
        }
    }
}

impl MiniGame for ColorMemoryEngine {
    type Config = ColorMemoryConfig;
    type Snapshot = ColorMemorySnapshot;

    fn kind(&self) -> GameKind {
        GameKind::ColorMemory
    }

    fn start(&mut self, config: ColorMemoryConfig) {
        self.reset();
        self.config = config;
        self.session.start(self.clock.now_ms());
        log::info!(
            "color memory started: win at {} rounds, {} colors",
            self.config.win_length,
            self.config.palette_size
        );
        self.next_round();
    }

    fn reset(&mut self) {
        self.timeline.cancel_all();
        self.flash = None;
        self.sequence.clear();
        self.player_input.clear();
        self.round_phase = RoundPhase::default();
        self.active = None;
        self.showing_index = 0;
        self.session.reset();
        self.reporter.clear();
    }

    fn render_state(&self) -> ColorMemorySnapshot {
        ColorMemorySnapshot {
            phase: self.session.phase,
            round_phase: self.round_phase,
            score: self.session.score,
            sequence: self.sequence.clone(),
            player_input: self.player_input.clone(),
            active: self.active,
            showing_index: self.showing_index,
            round: self.sequence.len(),
        }
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn set_on_end(&mut self, sink: Box<dyn ResultSink>) {
        self.reporter.set_sink(sink);
    }

    fn last_result(&self) -> Option<&GameResult> {
        self.reporter.last()
    }
}
