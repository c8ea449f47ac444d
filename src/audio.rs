//! Audio cues
//!
//! The game has three cues. Playback goes through a [`CueSink`]; the terminal
//! build rings the bell. A cue that cannot be played is skipped.

use std::io::{self, Write};

use crate::settings::Settings;
use crate::sim::{EndReason, GameEvent};

/// Sound cue identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Stone hits a hunter
    Hit,
    /// Run lost
    Failure,
    /// New top-five score
    Celebration,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Hit => "hit",
            SoundCue::Failure => "failure",
            SoundCue::Celebration => "celebration",
        }
    }

    /// Mix level before master/sfx volume
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundCue::Hit => 0.4,
            SoundCue::Failure => 0.3,
            SoundCue::Celebration => 0.5,
        }
    }

    /// Cue triggered by a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<SoundCue> {
        match event {
            GameEvent::EnemyHit { .. } => Some(SoundCue::Hit),
            GameEvent::RunEnded {
                reason: EndReason::OutOfLives,
            } => Some(SoundCue::Failure),
            _ => None,
        }
    }
}

/// Something that can make a cue audible
pub trait CueSink {
    fn emit(&mut self, cue: SoundCue, volume: f32) -> io::Result<()>;
}

/// Rings the terminal bell once per cue
pub struct BellSink<W: Write> {
    out: W,
}

impl<W: Write> BellSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> CueSink for BellSink<W> {
    fn emit(&mut self, _cue: SoundCue, _volume: f32) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn CueSink>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn CueSink>, settings: &Settings) -> Self {
        Self {
            sink: Some(sink),
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Manager with no output; every cue is skipped
    pub fn silent() -> Self {
        Self {
            sink: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Get effective volume for a cue
    fn effective_volume(&self, cue: SoundCue) -> f32 {
        if self.muted {
            0.0
        } else {
            cue.base_volume() * self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue. Never fails: missing output or a failed write is skipped.
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume(cue);
        if vol <= 0.0 {
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(e) = sink.emit(cue, vol) {
            log::debug!("Skipping {} cue: {}", cue.as_str(), e);
        }
    }

    /// Play whatever cues a batch of simulation events calls for
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for cue in events.iter().filter_map(SoundCue::for_event) {
            self.play(cue);
        }
    }
}
