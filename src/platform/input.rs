//! Keyboard input from crossterm, merged with controller input
//!
//! Terminals deliver key events, not key state. Presses are passed through as
//! discrete [`Key`]s and also update a [`KeyState`] that answers "is this key
//! held" for movement and throwing.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::controller::Controller;
use crate::sim::TickInput;
use crate::ui::EntryKey;

/// How long a key counts as held after its last press or repeat when the
/// terminal does not report releases. Longer than the usual key repeat delay
/// so a held key does not stall before repeats start.
pub const HOLD_WINDOW: Duration = Duration::from_millis(600);

/// Maximum events drained per frame
const MAX_EVENTS_PER_FRAME: usize = 64;

/// A discrete key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Esc,
    Backspace,
    /// Ctrl+C (raw mode swallows the signal)
    Interrupt,
    Char(char),
}

/// Keys whose held state matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoldKey {
    Left,
    Right,
    Fire,
}

impl Key {
    pub fn hold_key(&self) -> Option<HoldKey> {
        match self {
            Key::Left | Key::Char('a') | Key::Char('A') => Some(HoldKey::Left),
            Key::Right | Key::Char('d') | Key::Char('D') => Some(HoldKey::Right),
            Key::Up | Key::Char(' ') => Some(HoldKey::Fire),
            _ => None,
        }
    }

    pub fn is_pause(&self) -> bool {
        matches!(self, Key::Char('p') | Key::Char('P'))
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, Key::Esc | Key::Interrupt)
    }

    /// Meaning of this key on the name entry screen
    pub fn entry_key(&self) -> Option<EntryKey> {
        match self {
            Key::Enter => Some(EntryKey::Confirm),
            Key::Backspace => Some(EntryKey::Backspace),
            Key::Esc | Key::Interrupt => Some(EntryKey::Skip),
            Key::Char(c) => Some(EntryKey::Char(*c)),
            _ => None,
        }
    }
}

/// Translate a crossterm key event
pub fn translate(key: &KeyEvent) -> Option<Key> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Key::Interrupt),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

/// Held-key tracking
#[derive(Debug, Default)]
pub struct KeyState {
    last_seen: HashMap<HoldKey, Instant>,
    /// Set once the terminal has reported a release; from then on keys are
    /// held until released
    precise: bool,
}

impl KeyState {
    pub fn press(&mut self, key: HoldKey, now: Instant) {
        self.last_seen.insert(key, now);
    }

    pub fn release(&mut self, key: HoldKey) {
        self.precise = true;
        self.last_seen.remove(&key);
    }

    pub fn is_held(&self, key: HoldKey, now: Instant) -> bool {
        match self.last_seen.get(&key) {
            Some(_) if self.precise => true,
            Some(seen) => now.saturating_duration_since(*seen) <= HOLD_WINDOW,
            None => false,
        }
    }

    /// Apply one key event. Returns the key if it was a press (not a repeat).
    pub fn apply(&mut self, event: &KeyEvent, now: Instant) -> Option<Key> {
        let key = translate(event)?;
        let hold = key.hold_key();
        match event.kind {
            KeyEventKind::Press => {
                if let Some(h) = hold {
                    self.press(h, now);
                }
                Some(key)
            }
            KeyEventKind::Repeat => {
                if let Some(h) = hold {
                    self.press(h, now);
                }
                None
            }
            KeyEventKind::Release => {
                if let Some(h) = hold {
                    self.release(h);
                }
                None
            }
        }
    }

    /// Build the simulation input for this frame
    pub fn tick_input(&self, pressed: &[Key], now: Instant) -> TickInput {
        TickInput {
            left: self.is_held(HoldKey::Left, now),
            right: self.is_held(HoldKey::Right, now),
            axis: None,
            fire: self.is_held(HoldKey::Fire, now),
            pad_fire: false,
            pause: pressed.iter().any(Key::is_pause),
            quit: pressed.iter().any(Key::is_quit),
        }
    }
}

/// Samples the terminal, and the controller if there is one, once per frame
#[derive(Debug, Default)]
pub struct InputSource {
    pub keys: KeyState,
    pub controller: Option<Controller>,
}

impl InputSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Drain pending terminal events without blocking and return the key
    /// presses among them
    pub fn poll(&mut self) -> io::Result<Vec<Key>> {
        let mut pressed = Vec::new();
        let mut seen = 0;
        while seen < MAX_EVENTS_PER_FRAME && event::poll(Duration::ZERO)? {
            seen += 1;
            if let Event::Key(key) = event::read()? {
                if let Some(k) = self.keys.apply(&key, Instant::now()) {
                    pressed.push(k);
                }
            }
        }
        Ok(pressed)
    }

    /// One frame of simulation input
    pub fn sample(&mut self) -> io::Result<TickInput> {
        let pressed = self.poll()?;
        Ok(self.frame_input(&pressed, Instant::now()))
    }

    /// Keyboard state plus whatever the controller reports
    pub fn frame_input(&mut self, pressed: &[Key], now: Instant) -> TickInput {
        let mut input = self.keys.tick_input(pressed, now);
        if let Some(pad) = self.controller.as_mut() {
            pad.merge_into(&mut input);
        }
        input
    }
}
