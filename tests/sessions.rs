//! Lifecycle and reporting behaviour shared by every engine, through the public API

use std::cell::RefCell;
use std::rc::Rc;

use calm_arcade::sim::{
    BreakoutEngine, BreakoutInput, Cell, Color, ColorMemoryEngine, Direction, FlappyEngine,
    PlacedWord, Puzzle, RoundPhase, WordSearchEngine,
};
use calm_arcade::{
    GameKind, GameResult, ManualClock, MiniGame, RandomSource, ResultHistory, SessionPhase,
};

fn capture() -> (Rc<RefCell<Vec<GameResult>>>, Box<dyn FnMut(&GameResult)>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, Box::new(move |r: &GameResult| sink.borrow_mut().push(*r)))
}

#[test]
fn test_idle_engines_ignore_input() {
    let mut breakout = BreakoutEngine::with_clock(ManualClock::new());
    let before = breakout.render_state();
    breakout.tick(&BreakoutInput {
        left: true,
        ..Default::default()
    });
    assert_eq!(breakout.render_state(), before);

    let mut flappy = FlappyEngine::with_clock(1, ManualClock::new());
    let before = flappy.render_state();
    flappy.flap();
    flappy.tick();
    assert_eq!(flappy.render_state(), before);

    let mut words = WordSearchEngine::with_clock(1, ManualClock::new());
    assert_eq!(words.select(&[Cell::new(0, 0)]), None);
    assert_eq!(words.phase(), SessionPhase::Idle);

    let mut colors = ColorMemoryEngine::with_clock(1, ManualClock::new());
    colors.click(Color::Cyan);
    colors.advance(5_000);
    assert_eq!(colors.phase(), SessionPhase::Idle);
    assert!(colors.sequence().is_empty());
}

#[test]
fn test_breakout_reports_once() {
    let (seen, sink) = capture();
    let mut engine = BreakoutEngine::with_clock(ManualClock::new());
    engine.set_on_end(Box::new(sink));
    engine.start_default();

    // No input: the ball eventually drains all three lives
    for _ in 0..100_000 {
        engine.tick(&BreakoutInput::default());
        if engine.session().is_ended() {
            break;
        }
    }
    assert!(engine.session().is_ended());
    let frozen = engine.render_state();
    for _ in 0..100 {
        engine.tick(&BreakoutInput::default());
    }
    assert_eq!(engine.render_state(), frozen);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].game_type, GameKind::Breakout);
    assert!(!seen[0].completed);
    assert_eq!(seen[0].score % 10, 0);
}

#[test]
fn test_flappy_reports_once_and_restarts() {
    let (seen, sink) = capture();
    let clock = ManualClock::new();
    let mut engine = FlappyEngine::with_clock(3, clock.clone());
    engine.set_on_end(Box::new(sink));

    for _ in 0..2 {
        engine.start_default();
        while engine.session().is_playing() {
            engine.tick();
            clock.advance(16);
        }
        engine.tick();
    }

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|r| r.game_type == GameKind::FlappyBird && !r.completed));
    assert!(seen.iter().all(|r| r.time_played_ms > 0));
}

#[test]
fn test_word_search_shared_history() {
    let history = Rc::new(RefCell::new(ResultHistory::new()));
    let mut engine = WordSearchEngine::with_clock(5, ManualClock::new());
    let sink = Rc::clone(&history);
    engine.set_on_end(Box::new(move |r: &GameResult| {
        sink.borrow_mut().record(r);
    }));

    let mut rng = RandomSource::new(5);
    let placements = [PlacedWord {
        word: "SUN".into(),
        row: 0,
        col: 0,
        direction: Direction::East,
    }];
    let puzzle = Puzzle::from_placements(15, &placements, &mut rng).expect("SUN fits");
    engine.start_with_puzzle(puzzle);
    engine.select(&[Cell::new(0, 2), Cell::new(0, 0), Cell::new(0, 1)]);
    assert_eq!(engine.render_state().found, vec!["SUN"]);

    let history = history.borrow();
    let stats = history.stats(GameKind::WordSearch);
    assert_eq!(stats.total_played, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.best_score, 100);
}

#[test]
fn test_color_memory_reset_mid_playback() {
    let (seen, sink) = capture();
    let mut engine = ColorMemoryEngine::with_clock(8, ManualClock::new());
    engine.set_on_end(Box::new(sink));
    engine.start_default();
    engine.advance(700);
    assert!(engine.render_state().active.is_some());

    engine.reset();
    engine.reset();
    engine.advance(60_000);
    let snapshot = engine.render_state();
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.active, None);
    assert_eq!(snapshot.round_phase, RoundPhase::Showing);
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_reset_twice_matches_reset_once() {
    let mut breakout = BreakoutEngine::with_clock(ManualClock::new());
    breakout.start_default();
    breakout.tick(&BreakoutInput::default());
    breakout.reset();
    let once = breakout.render_state();
    breakout.reset();
    assert_eq!(breakout.render_state(), once);
    assert_eq!(once.phase, SessionPhase::Idle);

    let mut flappy = FlappyEngine::with_clock(2, ManualClock::new());
    flappy.start_default();
    flappy.tick();
    flappy.reset();
    let once = flappy.render_state();
    flappy.reset();
    assert_eq!(flappy.render_state(), once);

    let mut words = WordSearchEngine::with_clock(2, ManualClock::new());
    words.start_default();
    words.reset();
    let once = words.render_state();
    words.reset();
    assert_eq!(words.render_state(), once);

    let mut colors = ColorMemoryEngine::with_clock(2, ManualClock::new());
    colors.start_default();
    colors.reset();
    let once = colors.render_state();
    colors.reset();
    assert_eq!(colors.render_state(), once);
}

#[test]
fn test_result_json_shape() {
    let (seen, sink) = capture();
    let mut engine = ColorMemoryEngine::with_clock(4, ManualClock::new());
    engine.set_on_end(Box::new(sink));
    engine.start_default();
    while engine.round_phase() != RoundPhase::Input {
        engine.advance(100);
    }
    let wrong = Color::ALL
        .into_iter()
        .find(|c| engine.sequence().first() != Some(c))
        .expect("palette has more than one color");
    engine.click(wrong);

    let json = serde_json::to_value(seen.borrow()[0]).unwrap();
    assert_eq!(json["gameType"], "colormemory");
    assert_eq!(json["score"], 0);
    assert_eq!(json["completed"], false);
    assert!(json["timePlayedMs"].is_u64());
}
