//! Platform layer
//!
//! Terminal and controller input, and frame timing.

pub mod controller;
pub mod input;
pub mod time;

pub use controller::{Controller, PadEvent, PadState};
pub use input::{HoldKey, InputSource, Key, KeyState};
pub use time::{FrameClock, pause_ms};
