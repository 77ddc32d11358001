//! Calm Arcade demo driver
//!
//! Runs one autopilot session of every game against a shared result history
//! and prints the results as JSON.
//!
//! Usage: `calm-arcade [seed] [settings.json]`

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use calm_arcade::sim::{
    BreakoutEngine, BreakoutInput, ColorMemoryEngine, FlappyEngine, WordSearchEngine,
};
use calm_arcade::{
    GameKind, GameResult, GameStats, ManualClock, MiniGame, ResultHistory, ResultSink, Settings,
    SettingsError,
};

type SharedHistory = Rc<RefCell<ResultHistory>>;

const DEFAULT_SEED: u64 = 42;
/// Frame length the host pretends to run at
const FRAME_MS: u64 = 16;
/// Give up on a frame-tick session after this many frames (10 minutes)
const MAX_FRAMES: u32 = 37_500;
/// Flappy autopilot lets go after a minute so the run has an ending
const FLAPPY_AUTOPILOT_FRAMES: u32 = 3_750;
/// Pretend the player needs this long to find a word
const WORD_FIND_MS: u64 = 7_000;

fn main() {
    env_logger::init();
    log::info!("Calm Arcade (native) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), SettingsError> {
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>().map_err(|e| SettingsError::Invalid {
            field: "seed",
            reason: format!("{:?}: {}", arg, e),
        })?,
        None => DEFAULT_SEED,
    };
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    settings.validate()?;
    log::info!("seed={}", seed);

    let history = Rc::new(RefCell::new(ResultHistory::new()));
    let clock = ManualClock::new();

    play_breakout(&settings, &clock, &history);
    play_flappy(&settings, seed, &clock, &history);
    play_word_search(&settings, seed, &clock, &history);
    play_color_memory(&settings, seed, &clock, &history);

    let history = history.borrow();
    for result in history.results() {
        println!("{}", serde_json::to_string(result)?);
    }
    let stats: BTreeMap<&str, GameStats> = GameKind::ALL
        .iter()
        .map(|kind| (kind.as_str(), history.stats(*kind)))
        .collect();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn recorder(history: &SharedHistory) -> Box<dyn ResultSink> {
    let history = Rc::clone(history);
    Box::new(move |result: &GameResult| {
        history.borrow_mut().record(result);
    })
}

fn play_breakout(settings: &Settings, clock: &ManualClock, history: &SharedHistory) {
    let mut engine = BreakoutEngine::with_clock(clock.clone());
    engine.set_on_end(recorder(history));
    engine.start(settings.breakout);

    let input = BreakoutInput {
        autopilot: true,
        ..Default::default()
    };
    let mut frames = 0;
    while engine.session().is_playing() && frames < MAX_FRAMES {
        engine.tick(&input);
        clock.advance(FRAME_MS);
        frames += 1;
    }
    if engine.session().is_playing() {
        log::warn!(
            "breakout: autopilot stopped after {} frames with {} bricks left",
            frames,
            engine.state().bricks_remaining()
        );
        engine.reset();
    }
}

fn play_flappy(settings: &Settings, seed: u64, clock: &ManualClock, history: &SharedHistory) {
    let mut engine = FlappyEngine::with_clock(seed, clock.clone());
    engine.set_on_end(recorder(history));
    engine.start(settings.flappy);

    let mut frames = 0;
    while engine.session().is_playing() && frames < MAX_FRAMES {
        if frames < FLAPPY_AUTOPILOT_FRAMES && engine.autopilot_wants_flap() {
            engine.flap();
        }
        engine.tick();
        clock.advance(FRAME_MS);
        frames += 1;
    }
    if engine.session().is_playing() {
        log::warn!("flappy: autopilot stopped after {} frames, score {}", frames, engine.score());
        engine.reset();
    }
}

fn play_word_search(settings: &Settings, seed: u64, clock: &ManualClock, history: &SharedHistory) {
    let mut engine = WordSearchEngine::with_clock(seed, clock.clone());
    engine.set_on_end(recorder(history));
    engine.start(settings.word_search.clone());

    let size = engine.puzzle().size;
    let placed = engine.puzzle().placed.clone();
    for word in placed {
        clock.advance(WORD_FIND_MS);
        let mut cells = word.cells(size).into_iter();
        if let Some(first) = cells.next() {
            engine.begin_selection(first);
        }
        for cell in cells {
            engine.extend_selection(cell);
        }
        engine.finish_selection();
    }
}

fn play_color_memory(settings: &Settings, seed: u64, clock: &ManualClock, history: &SharedHistory) {
    let mut engine = ColorMemoryEngine::with_clock(seed, clock.clone());
    engine.set_on_end(recorder(history));
    engine.start(settings.color_memory.clone());

    let mut frames = 0;
    while engine.session().is_playing() && frames < MAX_FRAMES {
        while let Some(color) = engine.autopilot_choice() {
            engine.click(color);
        }
        engine.advance(FRAME_MS);
        clock.advance(FRAME_MS);
        frames += 1;
    }
}
