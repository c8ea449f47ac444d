//! High score leaderboard system
//!
//! Persisted to a plain text file, one `INITIALS SCORE` line per entry in
//! ranked order. Every entry is kept; only the display is capped.

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Number of entries shown on the high score screen
pub const DISPLAY_COUNT: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Player initials (1-3 uppercase letters when entered in game)
    pub initials: String,
    pub score: u64,
}

impl ScoreEntry {
    pub fn new(initials: impl Into<String>, score: u64) -> Self {
        Self {
            initials: initials.into(),
            score,
        }
    }
}

impl fmt::Display for ScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.initials, self.score)
    }
}

/// Ranking comparator: higher scores first. Equal scores compare equal so a
/// stable sort keeps them in insertion order.
pub fn rank_order(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    b.score.cmp(&a.score)
}

/// Errors from reading or writing the score file
#[derive(Debug)]
pub enum LedgerError {
    /// The file could not be read, created or written
    Io(io::Error),
    /// A line was not `INITIALS SCORE`
    Malformed { line: usize, content: String },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Io(e) => write!(f, "score file I/O error: {}", e),
            LedgerError::Malformed { line, content } => {
                write!(f, "malformed score on line {}: {:?}", line, content)
            }
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Io(e) => Some(e),
            LedgerError::Malformed { .. } => None,
        }
    }
}

impl From<io::Error> for LedgerError {
    fn from(e: io::Error) -> Self {
        LedgerError::Io(e)
    }
}

/// High score leaderboard, always sorted by [`rank_order`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a leaderboard from entries in any order
    pub fn from_entries(mut entries: Vec<ScoreEntry>) -> Self {
        entries.sort_by(rank_order);
        Self { entries }
    }

    /// All entries, best first
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The best `n` entries (all of them if there are fewer)
    pub fn top(&self, n: usize) -> &[ScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Check if a score belongs on the top-five display: true while the board
    /// has fewer than five entries, or if the score is at least as high as
    /// any of the current top five.
    pub fn is_top_five(&self, score: u64) -> bool {
        self.entries.len() < DISPLAY_COUNT || self.top(DISPLAY_COUNT).iter().any(|e| score >= e.score)
    }

    /// Add an entry and restore the ranking. Ties go after existing entries.
    pub fn insert(&mut self, entry: ScoreEntry) {
        self.entries.push(entry);
        self.entries.sort_by(rank_order);
    }

    /// Parse the file format. Blank or short lines, or a score that is not a
    /// non-negative integer, fail the whole parse.
    pub fn parse(text: &str) -> Result<Self, LedgerError> {
        let mut entries = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let entry = match (fields.next(), fields.next().map(str::parse::<u64>)) {
                (Some(initials), Some(Ok(score))) => ScoreEntry::new(initials, score),
                _ => {
                    return Err(LedgerError::Malformed {
                        line: idx + 1,
                        content: line.to_string(),
                    });
                }
            };
            entries.push(entry);
        }
        Ok(Self::from_entries(entries))
    }

    /// Serialize to the file format: one line per entry, no trailing newline
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(ScoreEntry::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// File-backed store for the leaderboard
#[derive(Debug, Clone)]
pub struct ScoreLedger {
    path: PathBuf,
}

impl ScoreLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the leaderboard. A missing file is created empty.
    pub fn load(&self) -> Result<Leaderboard, LedgerError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let board = Leaderboard::parse(&text)?;
                log::info!("Loaded {} high scores from {}", board.len(), self.path.display());
                Ok(board)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::File::create(&self.path)?;
                log::info!("No high scores found, created {}", self.path.display());
                Ok(Leaderboard::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the file with the board's current contents
    pub fn save(&self, board: &Leaderboard) -> Result<(), LedgerError> {
        fs::write(&self.path, board.to_text())?;
        log::info!("High scores saved ({} entries)", board.len());
        Ok(())
    }

    /// Insert `entry` and rewrite the file. The board is updated even when the
    /// write fails; the error is only about persistence.
    pub fn record(&self, board: &mut Leaderboard, entry: ScoreEntry) -> Result<(), LedgerError> {
        board.insert(entry);
        self.save(board)
    }
}
