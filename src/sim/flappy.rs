//! Auto-scrolling flight through pipe gaps
//!
//! Gravity pulls the bird down every tick; a flap replaces its vertical
//! velocity with a fixed upward kick. Pipes scroll in from the right with a
//! random gap height and score once each when they pass the bird. There is
//! no win condition: the session always ends with `completed = false`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::clock::{Clock, SystemClock};
use crate::consts::CANVAS_WIDTH;
use crate::engine::MiniGame;
use crate::report::{Reporter, ResultSink};
use crate::rng::RandomSource;
use crate::session::{GameKind, GameResult, Session, SessionPhase};

pub const BIRD_X: f32 = 100.0;
pub const BIRD_START_Y: f32 = 200.0;
pub const BIRD_RADIUS: f32 = 15.0;
/// Top of the ground strip; touching it ends the run
pub const GROUND_Y: f32 = 580.0;

pub const PIPE_WIDTH: f32 = 60.0;
/// New pipes enter here
pub const PIPE_SPAWN_X: f32 = CANVAS_WIDTH;
/// A new pipe spawns once the newest one has scrolled left of this
pub const PIPE_SPAWN_THRESHOLD: f32 = 600.0;
pub const PIPE_TOP_MIN: f32 = 50.0;
pub const PIPE_TOP_SPAN: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyConfig {
    /// Added to velocity every tick
    pub gravity: f32,
    /// Velocity set by a flap (negative is up)
    pub flap_velocity: f32,
    /// Pipe travel per tick
    pub scroll_speed: f32,
    /// Vertical opening between top and bottom pipe
    pub pipe_gap: f32,
}

impl Default for FlappyConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            flap_velocity: -8.0,
            scroll_speed: 2.0,
            pipe_gap: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    pub pos: Vec2,
    pub velocity: f32,
    pub radius: f32,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            pos: Vec2::new(BIRD_X, BIRD_START_Y),
            velocity: 0.0,
            radius: BIRD_RADIUS,
        }
    }
}

impl Bird {
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    pub x: f32,
    /// Bottom edge of the upper pipe
    pub top_height: f32,
    /// Top edge of the lower pipe
    pub bottom_y: f32,
    /// Set once, when the pipe's right edge passes the bird
    pub passed: bool,
}

impl Pipe {
    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH
    }

    /// Vertical centre of the opening
    pub fn gap_center(&self) -> f32 {
        (self.top_height + self.bottom_y) / 2.0
    }

    /// Solid upper and lower pipe segments
    pub fn segments(&self) -> [Rect; 2] {
        [
            Rect::new(self.x, 0.0, PIPE_WIDTH, self.top_height),
            Rect::new(self.x, self.bottom_y, PIPE_WIDTH, GROUND_Y - self.bottom_y),
        ]
    }

    /// True if `bounds` overlaps the solid part of this pipe
    pub fn blocks(&self, bounds: &Rect) -> bool {
        self.segments().iter().any(|segment| bounds.intersects(segment))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlappyState {
    pub bird: Bird,
    /// Left-to-right render order
    pub pipes: Vec<Pipe>,
    next_pipe_id: u32,
}

impl Default for FlappyState {
    fn default() -> Self {
        Self {
            bird: Bird::default(),
            pipes: Vec::new(),
            next_pipe_id: 1,
        }
    }
}

impl FlappyState {
    fn spawn_pipe(&mut self, rng: &mut RandomSource, gap: f32) {
        let id = self.next_pipe_id;
        self.next_pipe_id += 1;
        let top_height = rng.range(PIPE_TOP_MIN, PIPE_TOP_MIN + PIPE_TOP_SPAN);
        self.pipes.push(Pipe {
            id,
            x: PIPE_SPAWN_X,
            top_height,
            bottom_y: top_height + gap,
            passed: false,
        });
        log::debug!("flappy: pipe {} spawned, gap at {:.0}", id, top_height);
    }

    /// First pipe the bird has not yet fully cleared
    pub fn next_pipe(&self) -> Option<&Pipe> {
        let bird_left = self.bird.pos.x - self.bird.radius;
        self.pipes.iter().find(|p| p.right() >= bird_left)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlappySnapshot {
    pub phase: SessionPhase,
    pub score: u32,
    pub state: FlappyState,
}

pub struct FlappyEngine {
    config: FlappyConfig,
    state: FlappyState,
    session: Session,
    reporter: Reporter,
    clock: Box<dyn Clock>,
    rng: RandomSource,
}

impl FlappyEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_clock(seed, SystemClock::new())
    }

    pub fn with_clock(seed: u64, clock: impl Clock + 'static) -> Self {
        Self {
            config: FlappyConfig::default(),
            state: FlappyState::default(),
            session: Session::new(),
            reporter: Reporter::new(),
            clock: Box::new(clock),
            rng: RandomSource::new(seed),
        }
    }

    pub fn state(&self) -> &FlappyState {
        &self.state
    }

    /// Upward kick. Ignored unless playing.
    pub fn flap(&mut self) {
        if self.session.is_playing() {
            self.state.bird.velocity = self.config.flap_velocity;
        }
    }

    /// Advance one frame. No-op unless playing.
    pub fn tick(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        let config = self.config;
        let state = &mut self.state;

        // Gravity
        state.bird.velocity += config.gravity;
        state.bird.pos.y += state.bird.velocity;

        // Spawn
        let needs_pipe = state
            .pipes
            .last()
            .is_none_or(|p| p.x < PIPE_SPAWN_THRESHOLD);
        if needs_pipe {
            state.spawn_pipe(&mut self.rng, config.pipe_gap);
        }

        // Scroll, score passed pipes, then discard off-screen ones. A fast
        // pipe can clear the bird and leave the screen in the same tick.
        let bird_x = state.bird.pos.x;
        let mut passed = 0;
        for pipe in &mut state.pipes {
            pipe.x -= config.scroll_speed;
            if !pipe.passed && pipe.right() < bird_x {
                pipe.passed = true;
                passed += 1;
            }
        }
        self.session.add_score(passed);
        state.pipes.retain(|p| p.x > -PIPE_WIDTH);

        // Collisions
        let bounds = state.bird.bounds();
        if bounds.top() <= 0.0 || bounds.bottom() >= GROUND_Y {
            log::debug!("flappy: bird left the sky at y={:.1}", state.bird.pos.y);
            self.end();
            return;
        }
        let hit = state.pipes.iter().find(|p| p.blocks(&bounds)).map(|p| p.id);
        if let Some(id) = hit {
            log::debug!("flappy: bird hit pipe {}", id);
            self.end();
        }
    }

    /// Demo guidance: flap whenever the bird sinks below a point just under
    /// the middle of the next gap.
    pub fn autopilot_wants_flap(&self) -> bool {
        if !self.session.is_playing() {
            return false;
        }
        let target = match self.state.next_pipe() {
            Some(pipe) => pipe.top_height + self.config.pipe_gap * 2.0 / 3.0,
            None => GROUND_Y / 2.0,
        };
        self.state.bird.pos.y > target
    }

    fn end(&mut self) {
        let now = self.clock.now_ms();
        if let Some(result) = self.session.finish(GameKind::FlappyBird, false, now) {
            self.reporter.emit(result);
        }
    }
}

impl MiniGame for FlappyEngine {
    type Config = FlappyConfig;
    type Snapshot = FlappySnapshot;

    fn kind(&self) -> GameKind {
        GameKind::FlappyBird
    }

    fn start(&mut self, config: FlappyConfig) {
        self.reset();
        self.config = config;
        self.session.start(self.clock.now_ms());
        log::info!("flappy started (seed {})", self.rng.seed());
    }

    fn reset(&mut self) {
        self.state = FlappyState::default();
        self.session.reset();
        self.reporter.clear();
    }

    fn render_state(&self) -> FlappySnapshot {
        FlappySnapshot {
            phase: self.session.phase,
            score: self.session.score,
            state: self.state.clone(),
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
