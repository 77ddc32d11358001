//! Procedural word search
//!
//! Generation places each requested word along one of eight directions from
//! a random origin, retrying up to [`PLACEMENT_ATTEMPTS`] times. Words that
//! never fit are dropped; the placed list is what the player has to find.
//! Remaining cells get random letters.
//!
//! Matching sorts the selected cells row-major, reads their letters and
//! compares against each unfound word and its reverse, so a drag in either
//! direction along a line counts.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::engine::MiniGame;
use crate::report::{Reporter, ResultSink};
use crate::rng::RandomSource;
use crate::session::{GameKind, GameResult, Session, SessionPhase};
use crate::settings::{MIN_GRID_SIZE, SettingsError};

pub const DEFAULT_GRID_SIZE: usize = 15;
pub const PLACEMENT_ATTEMPTS: u32 = 50;
pub const WORD_POINTS: u32 = 100;

/// Themed word lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Space,
    Monuments,
    Cities,
    Science,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Space,
        Category::Monuments,
        Category::Cities,
        Category::Science,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Space => "space",
            Category::Monuments => "monuments",
            Category::Cities => "cities",
            Category::Science => "science",
        }
    }

    pub fn words(&self) -> &'static [&'static str] {
        match self {
            Category::Space => &[
                "GALAXY", "PLANET", "COMET", "NEBULA", "ORBIT", "SOLAR", "LUNAR", "COSMIC",
            ],
            Category::Monuments => &[
                "PYRAMID", "TOWER", "STATUE", "TEMPLE", "PALACE", "BRIDGE", "CASTLE", "SPHINX",
            ],
            Category::Cities => &[
                "PARIS", "TOKYO", "LONDON", "SYDNEY", "BERLIN", "MADRID", "ROME", "DUBAI",
            ],
            Category::Science => &[
                "ATOM", "MOLECULE", "ENERGY", "GRAVITY", "PHOTON", "QUANTUM", "PLASMA", "FUSION",
            ],
        }
    }
}

impl FromStr for Category {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| SettingsError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordSearchConfig {
    pub category: Category,
    pub grid_size: usize,
    /// Overrides the category's list when set
    pub words: Option<Vec<String>>,
}

impl Default for WordSearchConfig {
    fn default() -> Self {
        Self {
            category: Category::default(),
            grid_size: DEFAULT_GRID_SIZE,
            words: None,
        }
    }
}

impl WordSearchConfig {
    /// Requested words: upper-cased, blanks and duplicates removed, order kept
    pub fn requested_words(&self) -> Vec<String> {
        let source: Vec<String> = match &self.words {
            Some(words) => words.clone(),
            None => self.category.words().iter().map(|w| w.to_string()).collect(),
        };
        let mut seen = BTreeSet::new();
        source
            .into_iter()
            .map(|w| w.trim().to_uppercase())
            .filter(|w| !w.is_empty() && seen.insert(w.clone()))
            .collect()
    }
}

/// The eight line directions, in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// (row delta, col delta)
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
            Direction::SouthWest => (1, -1),
            Direction::South => (1, 0),
            Direction::SouthEast => (1, 1),
        }
    }
}

/// Grid coordinate. Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Cells covered by a line of `len` starting at (`row`, `col`), or `None` if
/// any of them falls outside a `size` x `size` grid
pub fn line_cells(
    size: usize,
    row: usize,
    col: usize,
    direction: Direction,
    len: usize,
) -> Option<Vec<Cell>> {
    let (dr, dc) = direction.delta();
    (0..len as isize)
        .map(|i| {
            let r = row as isize + i * dr;
            let c = col as isize + i * dc;
            let in_bounds = r >= 0 && c >= 0 && (r as usize) < size && (c as usize) < size;
            in_bounds.then(|| Cell::new(r as usize, c as usize))
        })
        .collect()
}

/// A word written into the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub word: String,
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
}

impl PlacedWord {
    pub fn cells(&self, size: usize) -> Vec<Cell> {
        line_cells(size, self.row, self.col, self.direction, self.word.chars().count())
            .unwrap_or_default()
    }
}

/// Partially filled grid used during generation
#[derive(Debug, Clone)]
pub struct LetterGrid {
    size: usize,
    cells: Vec<Option<char>>,
}

impl LetterGrid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, cell: Cell) -> Option<char> {
        if cell.row >= self.size || cell.col >= self.size {
            return None;
        }
        self.cells[cell.row * self.size + cell.col]
    }

    /// In bounds, and every occupied cell on the path already holds the
    /// letter the word needs there
    pub fn can_place(&self, word: &str, row: usize, col: usize, direction: Direction) -> bool {
        let len = word.chars().count();
        match line_cells(self.size, row, col, direction, len) {
            Some(cells) => cells
                .iter()
                .zip(word.chars())
                .all(|(&cell, letter)| self.get(cell).is_none_or(|existing| existing == letter)),
            None => false,
        }
    }

    /// Write the word along its path. Returns false (grid untouched) if it doesn't fit.
    pub fn place(&mut self, word: &str, row: usize, col: usize, direction: Direction) -> bool {
        if !self.can_place(word, row, col, direction) {
            return false;
        }
        let len = word.chars().count();
        if let Some(cells) = line_cells(self.size, row, col, direction, len) {
            for (cell, letter) in cells.into_iter().zip(word.chars()) {
                self.cells[cell.row * self.size + cell.col] = Some(letter);
            }
        }
        true
    }

    /// Fill every empty cell with a random letter
    pub fn fill(self, rng: &mut RandomSource) -> Vec<Vec<char>> {
        let size = self.size;
        let mut flat = self.cells.into_iter();
        (0..size)
            .map(|_| {
                flat.by_ref()
                    .take(size)
                    .map(|c| c.unwrap_or_else(|| rng.letter()))
                    .collect()
            })
            .collect()
    }
}

/// A fully generated puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub size: usize,
    /// Row-major letters, no empty cells
    pub grid: Vec<Vec<char>>,
    /// Words actually placed (authoritative for the win condition)
    pub placed: Vec<PlacedWord>,
}

impl Puzzle {
    /// Random placement with a bounded number of attempts per word
    pub fn generate(words: &[String], size: usize, rng: &mut RandomSource) -> Self {
        let mut grid = LetterGrid::new(size);
        let mut placed = Vec::new();

        for word in words {
            let mut attempts = 0;
            let mut done = false;
            while !done && attempts < PLACEMENT_ATTEMPTS {
                let direction = Direction::ALL[rng.index(Direction::ALL.len())];
                let row = rng.index(size);
                let col = rng.index(size);
                if grid.place(word, row, col, direction) {
                    placed.push(PlacedWord {
                        word: word.clone(),
                        row,
                        col,
                        direction,
                    });
                    done = true;
                }
                attempts += 1;
            }
            if !done {
                log::debug!("word search: dropped {} after {} attempts", word, attempts);
            }
        }

        Self {
            size,
            grid: grid.fill(rng),
            placed,
        }
    }

    /// Build a puzzle from fixed placements; `None` if any placement doesn't fit
    pub fn from_placements(
        size: usize,
        placements: &[PlacedWord],
        rng: &mut RandomSource,
    ) -> Option<Self> {
        let mut grid = LetterGrid::new(size);
        for p in placements {
            if !grid.place(&p.word, p.row, p.col, p.direction) {
                return None;
            }
        }
        Some(Self {
            size,
            grid: grid.fill(rng),
            placed: placements.to_vec(),
        })
    }

    pub fn letter(&self, cell: Cell) -> Option<char> {
        self.grid.get(cell.row).and_then(|row| row.get(cell.col)).copied()
    }

    /// Letters along a placed word's path
    pub fn read(&self, placed: &PlacedWord) -> String {
        placed
            .cells(self.size)
            .into_iter()
            .filter_map(|c| self.letter(c))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSearchSnapshot {
    pub phase: SessionPhase,
    pub score: u32,
    pub grid: Vec<Vec<char>>,
    /// Placed words in placement order
    pub words: Vec<String>,
    /// Found words in the order they were found
    pub found: Vec<String>,
    /// Cells highlighted permanently
    pub found_cells: Vec<Cell>,
    /// In-progress drag
    pub selection: Vec<Cell>,
    pub elapsed_ms: u64,
}

pub struct WordSearchEngine {
    config: WordSearchConfig,
    puzzle: Puzzle,
    /// Indices into `puzzle.placed`, in the order found
    found: Vec<usize>,
    found_cells: BTreeSet<Cell>,
    selection: Vec<Cell>,
    selecting: bool,
    session: Session,
    reporter: Reporter,
    clock: Box<dyn Clock>,
    rng: RandomSource,
}

impl WordSearchEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_clock(seed, SystemClock::new())
    }

    pub fn with_clock(seed: u64, clock: impl Clock + 'static) -> Self {
        Self {
            config: WordSearchConfig::default(),
            puzzle: empty_puzzle(DEFAULT_GRID_SIZE),
            found: Vec::new(),
            found_cells: BTreeSet::new(),
            selection: Vec::new(),
            selecting: false,
            session: Session::new(),
            reporter: Reporter::new(),
            clock: Box::new(clock),
            rng: RandomSource::new(seed),
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn is_found(&self, word: &str) -> bool {
        self.found.iter().any(|&i| self.puzzle.placed[i].word == word)
    }

    /// Play a prebuilt puzzle instead of generating one
    pub fn start_with_puzzle(&mut self, puzzle: Puzzle) {
        self.reset();
        self.puzzle = puzzle;
        self.begin_session();
    }

    fn begin_session(&mut self) {
        self.session.start(self.clock.now_ms());
        log::info!(
            "word search started: {}x{} grid, {} words",
            self.puzzle.size,
            self.puzzle.size,
            self.puzzle.placed.len()
        );
        if self.puzzle.placed.is_empty() {
            log::warn!("word search: no words could be placed, nothing to find");
            self.end(false);
        }
    }

    /// Start a drag on `cell`
    pub fn begin_selection(&mut self, cell: Cell) {
        if !self.session.is_playing() {
            return;
        }
        self.selecting = true;
        self.selection = vec![cell];
    }

    /// Extend the current drag
    pub fn extend_selection(&mut self, cell: Cell) {
        if self.selecting && !self.selection.contains(&cell) {
            self.selection.push(cell);
        }
    }

    /// Release the drag and check it. Returns the matched word.
    pub fn finish_selection(&mut self) -> Option<String> {
        if !self.selecting {
            return None;
        }
        self.selecting = false;
        let cells = std::mem::take(&mut self.selection);
        self.select(&cells)
    }

    /// Check a complete selection. Returns the matched word, if any.
    pub fn select(&mut self, cells: &[Cell]) -> Option<String> {
        self.selection.clear();
        if !self.session.is_playing() {
            return None;
        }

        let mut sorted: Vec<Cell> = cells.to_vec();
        sorted.sort();
        sorted.dedup();

        let letters: Option<String> = sorted.iter().map(|&c| self.puzzle.letter(c)).collect();
        let letters = letters?;
        let reversed: String = letters.chars().rev().collect();

        let idx = self
            .puzzle
            .placed
            .iter()
            .enumerate()
            .find(|(i, p)| !self.found.contains(i) && (p.word == letters || p.word == reversed))
            .map(|(i, _)| i)?;

        self.found.push(idx);
        self.found_cells.extend(sorted);
        self.session.add_score(WORD_POINTS);
        let word = self.puzzle.placed[idx].word.clone();
        log::debug!(
            "word search: found {} ({}/{})",
            word,
            self.found.len(),
            self.puzzle.placed.len()
        );

        if self.found.len() == self.puzzle.placed.len() {
            self.end(true);
        }
        Some(word)
    }

    fn end(&mut self, completed: bool) {
        let now = self.clock.now_ms();
        if let Some(result) = self.session.finish(GameKind::WordSearch, completed, now) {
            self.reporter.emit(result);
        }
    }

    fn elapsed_ms(&self) -> u64 {
        if self.session.is_playing() {
            self.clock.now_ms().saturating_sub(self.session.started_at_ms)
        } else {
            0
        }
    }
}

fn empty_puzzle(size: usize) -> Puzzle {
    Puzzle {
        size,
        grid: Vec::new(),
        placed: Vec::new(),
    }
}

impl MiniGame for WordSearchEngine {
    type Config = WordSearchConfig;
    type Snapshot = WordSearchSnapshot;

    fn kind(&self) -> GameKind {
        GameKind::WordSearch
    }

    fn start(&mut self, mut config: WordSearchConfig) {
        self.reset();
        if config.grid_size < MIN_GRID_SIZE {
            log::warn!(
                "word search: grid size {} raised to {}",
                config.grid_size,
                MIN_GRID_SIZE
            );
            config.grid_size = MIN_GRID_SIZE;
        }
        let words = config.requested_words();
        self.puzzle = Puzzle::generate(&words, config.grid_size, &mut self.rng);
        if self.puzzle.placed.len() < words.len() {
            log::debug!(
                "word search: placed {} of {} requested words",
                self.puzzle.placed.len(),
                words.len()
            );
        }
        self.config = config;
        self.begin_session();
    }

    fn reset(&mut self) {
        self.puzzle = empty_puzzle(self.config.grid_size);
        self.found.clear();
        self.found_cells.clear();
        self.selection.clear();
        self.selecting = false;
        self.session.reset();
        self.reporter.clear();
    }

    fn render_state(&self) -> WordSearchSnapshot {
        WordSearchSnapshot {
            phase: self.session.phase,
            score: self.session.score,
            grid: self.puzzle.grid.clone(),
            words: self.puzzle.placed.iter().map(|p| p.word.clone()).collect(),
            found: self
                .found
                .iter()
                .map(|&i| self.puzzle.placed[i].word.clone())
                .collect(),
            found_cells: self.found_cells.iter().copied().collect(),
            selection: self.selection.clone(),
            elapsed_ms: self.elapsed_ms(),
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
