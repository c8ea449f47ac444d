//! Frame pacing

use std::thread;
use std::time::{Duration, Instant};

/// Frame clock at a fixed rate
///
/// Each call to [`FrameClock::wait`] sleeps until the next frame deadline.
/// If the loop has fallen more than a frame behind, the schedule restarts
/// from now instead of running frames back to back.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame: Duration,
    next: Instant,
    pub frames: u64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self::starting_at(fps, Instant::now())
    }

    pub fn starting_at(fps: u32, now: Instant) -> Self {
        let frame = Duration::from_secs(1) / fps.max(1);
        Self {
            frame,
            next: now + frame,
            frames: 0,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Time left until the next deadline
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Advance the schedule past `now`, returning how long to sleep
    pub fn advance(&mut self, now: Instant) -> Duration {
        let sleep = self.remaining(now);
        self.frames += 1;
        if now > self.next + self.frame {
            log::trace!("Frame {} late, resyncing", self.frames);
            self.next = now + self.frame;
        } else {
            self.next += self.frame;
        }
        sleep
    }

    /// Sleep until the next frame is due
    pub fn wait(&mut self) {
        let sleep = self.advance(Instant::now());
        if !sleep.is_zero() {
            thread::sleep(sleep);
        }
    }
}

/// Sleep for a whole number of milliseconds
pub fn pause_ms(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}
