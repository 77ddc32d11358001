//! Brick breaker
//!
//! Fixed 8x10 brick wall, a paddle driven by left/right input and a single
//! ball. Each tick runs paddle -> ball -> walls -> paddle bounce -> bricks ->
//! bottom exit -> win check, in that order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::clock::{Clock, SystemClock};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::engine::MiniGame;
use crate::report::{Reporter, ResultSink};
use crate::session::{GameKind, GameResult, Session, SessionPhase};

pub const BRICK_ROWS: usize = 8;
pub const BRICK_COLS: usize = 10;
pub const BRICK_WIDTH: f32 = 75.0;
pub const BRICK_HEIGHT: f32 = 20.0;
/// Horizontal distance between brick origins
const BRICK_PITCH_X: f32 = 80.0;
/// Vertical distance between brick origins
const BRICK_PITCH_Y: f32 = 25.0;
const BRICK_OFFSET_X: f32 = 35.0;
const BRICK_OFFSET_Y: f32 = 60.0;
pub const BRICK_POINTS: u32 = 10;

/// Row colors, cycled top to bottom
pub const BRICK_COLORS: [u32; 5] = [0x2dd4bf, 0x8b5cf6, 0xec4899, 0x10b981, 0x06b6d4];

pub const PADDLE_WIDTH: f32 = 100.0;
pub const PADDLE_HEIGHT: f32 = 10.0;
pub const PADDLE_Y: f32 = 570.0;

pub const BALL_RADIUS: f32 = 8.0;
pub const BALL_START: Vec2 = Vec2::new(400.0, 300.0);

/// Tunables chosen at `start`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    pub lives: u8,
    /// Paddle travel per tick while a direction is held
    pub paddle_step: f32,
    /// Magnitude of each velocity component at launch
    pub ball_speed: f32,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            paddle_step: 8.0,
            ball_speed: 4.0,
        }
    }
}

/// Held directions for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreakoutInput {
    pub left: bool,
    pub right: bool,
    /// Demo mode - paddle follows the ball, direction keys ignored
    pub autopilot: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (CANVAS_WIDTH - PADDLE_WIDTH) / 2.0,
            y: PADDLE_Y,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }
}

impl Paddle {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    fn max_x(&self) -> f32 {
        CANVAS_WIDTH - self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Ball at the serve point heading up and to the right
    pub fn serve(speed: f32) -> Self {
        Self {
            pos: BALL_START,
            vel: Vec2::new(speed, -speed),
            radius: BALL_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
    /// Flips to false exactly once, when the ball breaks it
    pub visible: bool,
    /// 0xRRGGBB
    pub color: u32,
}

impl Brick {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, BRICK_WIDTH, BRICK_HEIGHT)
    }
}

/// Lay out the fixed brick wall, row-major
pub fn brick_wall() -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            bricks.push(Brick {
                x: col as f32 * BRICK_PITCH_X + BRICK_OFFSET_X,
                y: row as f32 * BRICK_PITCH_Y + BRICK_OFFSET_Y,
                visible: true,
                color: BRICK_COLORS[row % BRICK_COLORS.len()],
            });
        }
    }
    bricks
}

/// Everything the simulation mutates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutState {
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub lives: u8,
}

impl BreakoutState {
    pub fn new(config: &BreakoutConfig) -> Self {
        Self {
            paddle: Paddle::default(),
            ball: Ball::serve(config.ball_speed),
            bricks: brick_wall(),
            lives: config.lives,
        }
    }

    pub fn bricks_remaining(&self) -> usize {
        self.bricks.iter().filter(|b| b.visible).count()
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutSnapshot {
    pub phase: SessionPhase,
    pub score: u32,
    pub state: BreakoutState,
}

pub struct BreakoutEngine {
    config: BreakoutConfig,
    state: BreakoutState,
    session: Session,
    reporter: Reporter,
    clock: Box<dyn Clock>,
    /// Ticks simulated in the current session
    time_ticks: u64,
}

impl Default for BreakoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakoutEngine {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        let config = BreakoutConfig::default();
        Self {
            config,
            state: BreakoutState::new(&config),
            session: Session::new(),
            reporter: Reporter::new(),
            clock: Box::new(clock),
            time_ticks: 0,
        }
    }

    pub fn state(&self) -> &BreakoutState {
        &self.state
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Advance one frame. No-op unless playing.
    pub fn tick(&mut self, input: &BreakoutInput) {
        if !self.session.is_playing() {
            return;
        }
        self.time_ticks += 1;

        let mut input = *input;
        if input.autopilot {
            let center = self.state.paddle.center_x();
            let step = self.config.paddle_step;
            input.left = self.state.ball.pos.x < center - step;
            input.right = self.state.ball.pos.x > center + step;
        }

        let state = &mut self.state;

        // Paddle: both directions held cancel out
        let paddle = &mut state.paddle;
        if input.left {
            paddle.x -= self.config.paddle_step;
        }
        if input.right {
            paddle.x += self.config.paddle_step;
        }
        paddle.x = paddle.x.clamp(0.0, paddle.max_x());

        // Ball movement
        let ball = &mut state.ball;
        ball.pos += ball.vel;

        // Walls
        let r = ball.radius;
        if ball.pos.x <= r {
            ball.pos.x = r;
            ball.vel.x = ball.vel.x.abs();
        } else if ball.pos.x >= CANVAS_WIDTH - r {
            ball.pos.x = CANVAS_WIDTH - r;
            ball.vel.x = -ball.vel.x.abs();
        }
        if ball.pos.y <= r {
            ball.pos.y = r;
            ball.vel.y = ball.vel.y.abs();
        }

        // Paddle bounce: axis flip only, contact point doesn't matter
        let paddle = &state.paddle;
        let over_paddle = ball.pos.x > paddle.x && ball.pos.x < paddle.x + paddle.width;
        if ball.pos.y + r > paddle.y && over_paddle {
            ball.vel.y = -ball.vel.y.abs();
        }

        // Bricks
        let mut hits = 0u32;
        for brick in state.bricks.iter_mut().filter(|b| b.visible) {
            if brick.rect().contains_point(ball.pos) {
                brick.visible = false;
                ball.vel.y = -ball.vel.y;
                hits += 1;
            }
        }
        if hits > 0 {
            self.session.add_score(hits * BRICK_POINTS);
        }

        // Bottom exit
        if state.ball.pos.y > CANVAS_HEIGHT {
            state.lives = state.lives.saturating_sub(1);
            log::debug!("breakout: ball lost, {} lives left", state.lives);
            if state.lives == 0 {
                self.end(false);
                return;
            }
            state.ball = Ball::serve(self.config.ball_speed);
        }

        if state.bricks.iter().all(|b| !b.visible) {
            self.end(true);
        }
    }

    fn end(&mut self, completed: bool) {
        let now = self.clock.now_ms();
        if let Some(result) = self.session.finish(GameKind::Breakout, completed, now) {
            self.reporter.emit(result);
        }
    }
}

impl MiniGame for BreakoutEngine {
    type Config = BreakoutConfig;
    type Snapshot = BreakoutSnapshot;

    fn kind(&self) -> GameKind {
        GameKind::Breakout
    }

    fn start(&mut self, config: BreakoutConfig) {
        self.reset();
        self.config = config;
        self.state = BreakoutState::new(&config);
        self.session.start(self.clock.now_ms());
        log::info!(
            "breakout started: {} bricks, {} lives",
            self.state.bricks.len(),
            self.state.lives
        );
    }

    fn reset(&mut self) {
        self.state = BreakoutState::new(&self.config);
        self.session.reset();
        self.reporter.clear();
        self.time_ticks = 0;
    }

    fn render_state(&self) -> BreakoutSnapshot {
        BreakoutSnapshot {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn started() -> (BreakoutEngine, ManualClock) {
        let clock = ManualClock::new();
        let mut engine = BreakoutEngine::with_clock(clock.clone());
        engine.start_default();
        (engine, clock)
    }

    #[test]
    fn test_initial_layout() {
        let (engine, _) = started();
        let state = engine.state();
        assert_eq!(state.bricks.len(), 80);
        assert_eq!(state.bricks_remaining(), 80);
        assert_eq!(state.paddle.x, 350.0);
        assert_eq!(state.ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.ball.vel, Vec2::new(4.0, -4.0));
        assert_eq!(state.lives, 3);
        assert_eq!(state.bricks[0].x, 35.0);
        assert_eq!(state.bricks[0].y, 60.0);
        assert_eq!(state.bricks[79].x, 9.0 * 80.0 + 35.0);
        assert_eq!(state.bricks[79].y, 7.0 * 25.0 + 60.0);
        assert_eq!(state.bricks[10].color, BRICK_COLORS[1]);
        assert_eq!(state.bricks[50].color, BRICK_COLORS[0]);
    }

    #[test]
    fn test_tick_is_noop_unless_playing() {
        let mut engine = BreakoutEngine::with_clock(ManualClock::new());
        let before = engine.render_state();
        engine.tick(&BreakoutInput::default());
        assert_eq!(engine.render_state(), before);
        assert_eq!(engine.time_ticks(), 0);
    }

    #[test]
    fn test_paddle_moves_and_clamps() {
        let (mut engine, _) = started();
        let left = BreakoutInput {
            left: true,
            ..Default::default()
        };
        engine.tick(&left);
        assert_eq!(engine.state().paddle.x, 342.0);

        for _ in 0..100 {
            engine.tick(&left);
            engine.state.ball = Ball::serve(4.0);
        }
        assert_eq!(engine.state().paddle.x, 0.0);

        let right = BreakoutInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..200 {
            engine.tick(&right);
            engine.state.ball = Ball::serve(4.0);
        }
        assert_eq!(engine.state().paddle.x, 700.0);
    }

    #[test]
    fn test_both_directions_cancel() {
        let (mut engine, _) = started();
        let both = BreakoutInput {
            left: true,
            right: true,
            ..Default::default()
        };
        engine.tick(&both);
        assert_eq!(engine.state().paddle.x, 350.0);
    }

    #[test]
    fn test_wall_bounce() {
        let (mut engine, _) = started();
        engine.state.ball.pos = Vec2::new(12.0, 400.0);
        engine.state.ball.vel = Vec2::new(-4.0, 4.0);
        engine.tick(&BreakoutInput::default());
        assert_eq!(engine.state().ball.pos.x, 8.0);
        assert_eq!(engine.state().ball.vel.x, 4.0);

        engine.state.ball.pos = Vec2::new(400.0, 12.0);
        engine.state.ball.vel = Vec2::new(4.0, -4.0);
        engine.tick(&BreakoutInput::default());
        assert_eq!(engine.state().ball.vel.y, 4.0);
    }

    #[test]
    fn test_paddle_bounce_is_axis_flip() {
        let (mut engine, _) = started();
        // Ball dropping onto the left edge of the paddle
        engine.state.ball.pos = Vec2::new(360.0, 560.0);
        engine.state.ball.vel = Vec2::new(-4.0, 4.0);
        engine.tick(&BreakoutInput::default());
        assert_eq!(engine.state().ball.vel, Vec2::new(-4.0, -4.0));
    }

    #[test]
    fn test_brick_hit_scores_and_flips() {
        let (mut engine, _) = started();
        let brick = engine.state.bricks[0];
        engine.state.ball.pos = Vec2::new(brick.x + 10.0 - 4.0, brick.y + 10.0 + 4.0);
        engine.state.ball.vel = Vec2::new(4.0, -4.0);
        engine.tick(&BreakoutInput::default());

        assert!(!engine.state().bricks[0].visible);
        assert_eq!(engine.state().ball.vel.y, 4.0);
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.state().bricks_remaining(), 79);
    }

    #[test]
    fn test_clearing_every_brick_wins() {
        let (mut engine, clock) = started();
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&results);
        engine.set_on_end(Box::new(move |r: &GameResult| sink.borrow_mut().push(*r)));

        for i in 0..engine.state.bricks.len() {
            clock.advance(16);
            let brick = engine.state.bricks[i];
            let vel = Vec2::new(4.0, -4.0);
            engine.state.ball.vel = vel;
            engine.state.ball.pos = Vec2::new(brick.x + 10.0, brick.y + 10.0) - vel;
            engine.tick(&BreakoutInput::default());
        }

        assert_eq!(engine.phase(), SessionPhase::Ended);
        let results = results.borrow();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].game_type, GameKind::Breakout);
        assert_eq!(results[0].score, 800);
        assert!(results[0].completed);
        assert_eq!(results[0].time_played_ms, 80 * 16);
    }

    #[test]
    fn test_three_misses_lose() {
        let (mut engine, _) = started();
        for expected_lives in [2, 1, 0] {
            engine.state.ball.pos = Vec2::new(20.0, 590.0);
            engine.state.ball.vel = Vec2::new(4.0, 4.0);
            for _ in 0..5 {
                engine.tick(&BreakoutInput::default());
            }
            assert_eq!(engine.state().lives, expected_lives);
        }

        assert_eq!(engine.phase(), SessionPhase::Ended);
        let result = engine.last_result().copied().unwrap();
        assert_eq!(result.score, 0);
        assert!(!result.completed);
    }

    #[test]
    fn test_respawn_after_life_lost() {
        let (mut engine, _) = started();
        engine.state.ball.pos = Vec2::new(20.0, 598.0);
        engine.state.ball.vel = Vec2::new(4.0, 4.0);
        engine.tick(&BreakoutInput::default());
        assert_eq!(engine.state().lives, 2);
        assert_eq!(engine.state().ball, Ball::serve(4.0));
        assert_eq!(engine.phase(), SessionPhase::Playing);
    }

    #[test]
    fn test_ended_session_ignores_ticks() {
        let (mut engine, _) = started();
        engine.state.lives = 1;
        engine.state.ball.pos = Vec2::new(20.0, 598.0);
        engine.state.ball.vel = Vec2::new(4.0, 4.0);
        engine.tick(&BreakoutInput::default());
        assert_eq!(engine.phase(), SessionPhase::Ended);

        let frozen = engine.render_state();
        engine.tick(&BreakoutInput::default());
        assert_eq!(engine.render_state(), frozen);
    }

    #[test]
    fn test_reset_idempotent_and_restores_layout() {
        let (mut engine, _) = started();
        for _ in 0..50 {
            engine.tick(&BreakoutInput::default());
        }
        engine.reset();
        let once = engine.render_state();
        engine.reset();
        assert_eq!(engine.render_state(), once);
        assert_eq!(once.phase, SessionPhase::Idle);
        assert_eq!(once.state, BreakoutState::new(&BreakoutConfig::default()));
        assert!(engine.last_result().is_none());
    }

    #[test]
    fn test_autopilot_tracks_ball() {
        let (mut engine, _) = started();
        engine.state.ball.pos = Vec2::new(100.0, 300.0);
        let auto = BreakoutInput {
            autopilot: true,
            ..Default::default()
        };
        engine.tick(&auto);
        assert_eq!(engine.state().paddle.x, 342.0);
    }

    fn input_strategy() -> impl Strategy<Value = BreakoutInput> {
        (any::<bool>(), any::<bool>(), prop::bool::weighted(0.3)).prop_map(
            |(left, right, autopilot)| BreakoutInput {
                left,
                right,
                autopilot,
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_lives_score_and_bounds(inputs in prop::collection::vec(input_strategy(), 1..1500)) {
            let (mut engine, _) = started();
            let mut lives = engine.state().lives;
            let mut score = engine.score();

            for input in &inputs {
                engine.tick(input);
                let state = engine.state();

                prop_assert!(state.lives <= lives);
                prop_assert!(engine.score() >= score);
                prop_assert_eq!(engine.score() % BRICK_POINTS, 0);
                lives = state.lives;
                score = engine.score();

                if engine.phase() == SessionPhase::Playing {
                    let pos = state.ball.pos;
                    prop_assert!(pos.x >= 0.0 && pos.x <= CANVAS_WIDTH);
                    prop_assert!(pos.y >= 0.0 && pos.y <= CANVAS_HEIGHT);
                    prop_assert!(state.paddle.x >= 0.0 && state.paddle.x <= 700.0);
                } else {
                    break;
                }
            }
        }
    }
}
