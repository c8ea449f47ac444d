//! Bear Guard - a single-screen terminal arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, lives)
//! - `highscores`: Score ledger persisted as a plain text file
//! - `renderer`: Drawing surface and the crossterm terminal backend
//! - `ui`: Play, name entry and high-score screens
//! - `platform`: Terminal and controller input, frame timing
//! - `audio`: Sound cues
//! - `settings` / `tuning`: JSON configuration and game balance

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::{Leaderboard, LedgerError, ScoreEntry, ScoreLedger};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frames per second
    pub const TICK_RATE: u32 = 60;

    /// Pause after the run ends before name entry, so the failure cue can
    /// finish
    pub const GAME_OVER_PAUSE_MS: u64 = 1500;
    /// Pause after the celebration cue
    pub const CELEBRATION_PAUSE_MS: u64 = 500;

    /// Length of a player's initials
    pub const MAX_INITIALS: usize = 3;

    pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";
    pub const DEFAULT_LOG_PATH: &str = "bear-guard.log";
    /// First Linux joystick device
    pub const DEFAULT_JOYSTICK_PATH: &str = "/dev/input/js0";
}
