//! Bear Guard entry point
//!
//! Parses the command line, sets up logging and the terminal, runs one game
//! and then the post-game flow: name entry, score recording and the high
//! score table.

use std::fs::File;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;

use bear_guard::audio::{AudioManager, BellSink, SoundCue};
use bear_guard::consts::*;
use bear_guard::highscores::{DISPLAY_COUNT, Leaderboard, ScoreEntry, ScoreLedger};
use bear_guard::platform::{Controller, FrameClock, InputSource, pause_ms};
use bear_guard::renderer::{Surface, TerminalRenderer, terminal};
use bear_guard::settings::Settings;
use bear_guard::sim::{GameState, tick};
use bear_guard::ui::{self, EntryOutcome, NameEntry};

/// Protect the cub from the falling hunters
#[derive(Parser, Debug)]
#[command(name = "bear-guard", version, about)]
struct Args {
    /// Settings file (created with defaults if missing)
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// High score file, overrides the settings file
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Seed for spawn positions and stone variants
    #[arg(long)]
    seed: Option<u64>,

    /// Start with sound muted
    #[arg(long)]
    mute: bool,

    /// Print the high score table and exit
    #[arg(long)]
    show_highscores: bool,

    /// Log output file
    #[arg(long, default_value = DEFAULT_LOG_PATH)]
    log_file: PathBuf,

    /// Joystick device for a game controller
    #[arg(long, default_value = DEFAULT_JOYSTICK_PATH)]
    joystick: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;
    log::info!("Bear Guard v{} starting", env!("CARGO_PKG_VERSION"));

    let mut settings = Settings::load_or_init(&args.settings);
    if let Some(path) = args.scores {
        settings.scores_path = path;
    }
    if args.mute {
        settings.muted = true;
    }

    let ledger = ScoreLedger::new(settings.scores_path.clone());
    let mut board = ledger
        .load()
        .with_context(|| format!("Failed to load high scores from {}", ledger.path().display()))?;

    if args.show_highscores {
        print_high_scores(&board);
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(time_seed);
    log::info!("Seed {}", seed);

    install_panic_hook();
    terminal::enter_or_restore(&mut io::stdout()).context("Failed to set up the terminal")?;
    let result = run(&settings, &args.joystick, &ledger, &mut board, seed);
    let restored = terminal::leave(&mut io::stdout());

    result?;
    restored.context("Failed to restore the terminal")?;
    log::info!("Bye");
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Put the terminal back before a panic message is printed
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = terminal::leave(&mut io::stdout());
        default_hook(info);
    }));
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn print_high_scores(board: &Leaderboard) {
    println!("HIGH SCORES");
    if board.is_empty() {
        println!("(none yet)");
    }
    for (i, entry) in board.top(DISPLAY_COUNT).iter().enumerate() {
        println!("{}. {}", i + 1, entry);
    }
}

/// Everything that lives for the whole session
struct App {
    renderer: TerminalRenderer<Stdout>,
    input: InputSource,
    audio: AudioManager,
    fps: u32,
}

impl App {
    fn new(settings: &Settings, joystick: &Path) -> Result<Self> {
        let (cols, rows) = crossterm::terminal::size().context("Failed to read terminal size")?;
        let world = Vec2::new(settings.tuning.arena_width, settings.tuning.arena_height);
        let input = match Controller::open(joystick) {
            Ok(pad) => InputSource::new().with_controller(pad),
            Err(e) => {
                log::info!("No controller at {}: {}", joystick.display(), e);
                InputSource::new()
            }
        };
        Ok(Self {
            renderer: TerminalRenderer::new(io::stdout(), cols, rows, world),
            input,
            audio: AudioManager::new(Box::new(BellSink::new(io::stdout())), settings),
            fps: settings.effective_fps(),
        })
    }

    /// Follow terminal resizes
    fn sync_size(&mut self) -> io::Result<()> {
        let (cols, rows) = crossterm::terminal::size()?;
        self.renderer.resize(cols, rows);
        Ok(())
    }

    /// Run the game until it ends. Returns the final score.
    fn play(&mut self, state: &mut GameState) -> Result<u64> {
        let mut clock = FrameClock::new(self.fps);
        while !state.is_over() {
            let input = self.input.sample()?;
            let before = state.phase;
            tick(state, &input);
            if state.phase != before {
                log::debug!("Phase {:?} -> {:?}", before, state.phase);
            }
            let events = state.drain_events();
            self.audio.play_events(&events);

            self.sync_size()?;
            ui::draw_play(&mut self.renderer, state);
            self.renderer.present()?;
            clock.wait();
        }
        Ok(state.player.score)
    }

    /// Initials for the score, or None if the player skipped
    fn enter_name(&mut self, score: u64) -> Result<Option<String>> {
        let mut entry = NameEntry::new();
        let mut clock = FrameClock::new(self.fps);
        loop {
            for key in self.input.poll()? {
                let Some(key) = key.entry_key() else {
                    continue;
                };
                match entry.handle(key) {
                    EntryOutcome::Editing => {}
                    EntryOutcome::Confirmed(name) => return Ok(Some(name)),
                    EntryOutcome::Skipped => return Ok(None),
                }
            }
            self.sync_size()?;
            ui::draw_name_entry(&mut self.renderer, score, &entry);
            self.renderer.present()?;
            clock.wait();
        }
    }

    /// Show the table until any key is pressed
    fn show_high_scores(&mut self, board: &Leaderboard, score: u64) -> Result<()> {
        let mut clock = FrameClock::new(self.fps);
        loop {
            if !self.input.poll()?.is_empty() {
                return Ok(());
            }
            self.sync_size()?;
            ui::draw_high_scores(&mut self.renderer, board, score);
            self.renderer.present()?;
            clock.wait();
        }
    }

    fn post_game(&mut self, ledger: &ScoreLedger, board: &mut Leaderboard, score: u64) -> Result<()> {
        ui::draw_blank(&mut self.renderer);
        self.renderer.present()?;
        pause_ms(GAME_OVER_PAUSE_MS);

        let name = self.enter_name(score)?;
        let top_five = board.is_top_five(score);

        if let Some(initials) = &name {
            log::info!("Recording {} {}", initials, score);
            if let Err(e) = ledger.record(board, ScoreEntry::new(initials.clone(), score)) {
                log::warn!("Failed to save high scores to {}: {}", ledger.path().display(), e);
            }
            if top_five {
                self.audio.play(SoundCue::Celebration);
                pause_ms(CELEBRATION_PAUSE_MS);
            }
        } else {
            log::info!("Name entry skipped, score {} not recorded", score);
        }

        self.show_high_scores(board, score)
    }
}

fn run(
    settings: &Settings,
    joystick: &Path,
    ledger: &ScoreLedger,
    board: &mut Leaderboard,
    seed: u64,
) -> Result<()> {
    let mut app = App::new(settings, joystick)?;
    let mut state = GameState::new(seed, settings.tuning.clone());
    let score = app.play(&mut state)?;
    app.post_game(ledger, board, score)
}
