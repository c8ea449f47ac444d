//! Game controller input
//!
//! Reads the Linux joystick interface (`/dev/input/jsN`) on a background
//! thread. The left stick X axis steers, the South button throws and Start
//! toggles pause.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::sim::TickInput;

pub const STEER_AXIS: u8 = 0;
pub const FIRE_BUTTON: u8 = 0;
pub const START_BUTTON: u8 = 7;

const AXIS_MAX: f32 = 32767.0;

// js_event.type bits
const JS_EVENT_BUTTON: u8 = 0x01;
const JS_EVENT_AXIS: u8 = 0x02;
const JS_EVENT_INIT: u8 = 0x80;

/// One joystick event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadEvent {
    Button { number: u8, pressed: bool, init: bool },
    Axis { number: u8, value: i16, init: bool },
}

impl PadEvent {
    /// Decode an 8-byte `js_event`: `u32` time, `i16` value, `u8` type, `u8` number
    pub fn decode(raw: [u8; 8]) -> Option<Self> {
        let value = i16::from_ne_bytes([raw[4], raw[5]]);
        let (kind, number) = (raw[6], raw[7]);
        let init = kind & JS_EVENT_INIT != 0;
        match kind & !JS_EVENT_INIT {
            JS_EVENT_BUTTON => Some(PadEvent::Button {
                number,
                pressed: value != 0,
                init,
            }),
            JS_EVENT_AXIS => Some(PadEvent::Axis {
                number,
                value,
                init,
            }),
            _ => None,
        }
    }
}

/// Controller state as of the last applied event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadState {
    /// Stick position in [-1, 1]
    pub axis: f32,
    pub fire: bool,
    start_pressed: bool,
}

impl PadState {
    pub fn apply(&mut self, event: PadEvent) {
        match event {
            PadEvent::Axis {
                number: STEER_AXIS,
                value,
                ..
            } => self.axis = (f32::from(value) / AXIS_MAX).clamp(-1.0, 1.0),
            PadEvent::Button {
                number: FIRE_BUTTON,
                pressed,
                ..
            } => self.fire = pressed,
            // Initial state reports are not presses
            PadEvent::Button {
                number: START_BUTTON,
                pressed: true,
                init: false,
            } => self.start_pressed = true,
            _ => {}
        }
    }

    /// Whether Start was pressed since the last call
    pub fn take_start(&mut self) -> bool {
        std::mem::take(&mut self.start_pressed)
    }
}

/// A connected controller
#[derive(Debug)]
pub struct Controller {
    events: Receiver<PadEvent>,
    state: PadState,
    connected: bool,
}

impl Controller {
    /// Open a joystick device and start reading it
    pub fn open(path: &Path) -> io::Result<Self> {
        let mut device = File::open(path)?;
        let name = path.display().to_string();
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("controller".into())
            .spawn(move || {
                let mut raw = [0u8; 8];
                loop {
                    if let Err(e) = device.read_exact(&mut raw) {
                        log::info!("Controller {} closed: {}", name, e);
                        return;
                    }
                    if let Some(event) = PadEvent::decode(raw) {
                        if tx.send(event).is_err() {
                            return;
                        }
                    }
                }
            })?;
        log::info!("Controller opened at {}", path.display());
        Ok(Self::from_events(rx))
    }

    /// Controller fed from an event channel
    pub fn from_events(events: Receiver<PadEvent>) -> Self {
        Self {
            events,
            state: PadState::default(),
            connected: true,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Apply every pending event
    pub fn poll(&mut self) -> &mut PadState {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.state.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.connected {
                        log::warn!("Controller disconnected");
                        self.connected = false;
                        self.state = PadState::default();
                    }
                    break;
                }
            }
        }
        &mut self.state
    }

    /// Add this frame's controller input to the keyboard input
    pub fn merge_into(&mut self, input: &mut TickInput) {
        let pad = self.poll();
        let (axis, fire, start) = (pad.axis, pad.fire, pad.take_start());
        if !self.connected {
            return;
        }
        input.axis = Some(axis);
        input.pad_fire = fire;
        input.pause |= start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(value: i16, kind: u8, number: u8) -> [u8; 8] {
        let v = value.to_ne_bytes();
        [0, 0, 0, 0, v[0], v[1], kind, number]
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            PadEvent::decode(raw(1, JS_EVENT_BUTTON, 7)),
            Some(PadEvent::Button {
                number: 7,
                pressed: true,
                init: false
            })
        );
        assert_eq!(
            PadEvent::decode(raw(-32767, JS_EVENT_AXIS | JS_EVENT_INIT, 0)),
            Some(PadEvent::Axis {
                number: 0,
                value: -32767,
                init: true
            })
        );
        assert_eq!(PadEvent::decode(raw(0, 0x04, 0)), None);
    }

    #[test]
    fn test_start_is_an_edge() {
        let mut pad = PadState::default();
        pad.apply(PadEvent::Button {
            number: START_BUTTON,
            pressed: true,
            init: true,
        });
        assert!(!pad.take_start());

        pad.apply(PadEvent::Button {
            number: START_BUTTON,
            pressed: true,
            init: false,
        });
        assert!(pad.take_start());
        assert!(!pad.take_start());
    }

    #[test]
    fn test_merge_feeds_tick_input() {
        let (tx, rx) = mpsc::channel();
        let mut pad = Controller::from_events(rx);
        tx.send(PadEvent::Axis {
            number: STEER_AXIS,
            value: 32767,
            init: false,
        })
        .unwrap();
        tx.send(PadEvent::Button {
            number: FIRE_BUTTON,
            pressed: true,
            init: false,
        })
        .unwrap();
        tx.send(PadEvent::Button {
            number: START_BUTTON,
            pressed: true,
            init: false,
        })
        .unwrap();

        let mut input = TickInput::default();
        pad.merge_into(&mut input);
        assert_eq!(input.axis, Some(1.0));
        assert!(input.pad_fire);
        assert!(input.pause);

        // Fire stays held, start does not repeat
        let mut input = TickInput::default();
        pad.merge_into(&mut input);
        assert!(input.pad_fire);
        assert!(!input.pause);
    }

    #[test]
    fn test_disconnect_clears_input() {
        let (tx, rx) = mpsc::channel();
        let mut pad = Controller::from_events(rx);
        tx.send(PadEvent::Button {
            number: FIRE_BUTTON,
            pressed: true,
            init: false,
        })
        .unwrap();
        drop(tx);

        let mut input = TickInput::default();
        pad.merge_into(&mut input);
        assert!(!pad.is_connected());
        assert_eq!(input.axis, None);
        assert!(!input.pad_fire);
    }
}
