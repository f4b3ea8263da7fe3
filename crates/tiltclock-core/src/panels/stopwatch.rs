//! Free-running stopwatch.
//!
//! Elapsed time advances by a fixed quantum per `tick()`, not by wall-clock
//! delta. Drift between the tick cadence and real time is accepted.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::format::{self, StopwatchDisplay};

/// Milliseconds added per tick.
pub const QUANTUM_MS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwatchStatus {
    Ready,
    Recording,
    Paused,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stopwatch {
    elapsed_ms: u64,
    running: bool,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn status(&self) -> StopwatchStatus {
        if self.running {
            StopwatchStatus::Recording
        } else if self.elapsed_ms > 0 {
            StopwatchStatus::Paused
        } else {
            StopwatchStatus::Ready
        }
    }

    pub fn display(&self) -> StopwatchDisplay {
        format::stopwatch(self.elapsed_ms)
    }

    /// Cadence the caller should tick at, `None` while stopped.
    pub fn tick_period(&self) -> Option<Duration> {
        self.running.then(|| Duration::from_millis(QUANTUM_MS))
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        Some(Event::StopwatchStarted {
            elapsed_ms: self.elapsed_ms,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::StopwatchPaused {
            elapsed_ms: self.elapsed_ms,
            at: Utc::now(),
        })
    }

    /// Start when stopped, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.elapsed_ms = 0;
        self.running = false;
        Some(Event::StopwatchReset { at: Utc::now() })
    }

    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_ms = self.elapsed_ms.saturating_add(QUANTUM_MS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pause_reset() {
        let mut sw = Stopwatch::new();
        assert_eq!(sw.status(), StopwatchStatus::Ready);
        assert!(sw.tick_period().is_none());

        assert!(sw.start().is_some());
        assert!(sw.start().is_none());
        assert_eq!(sw.status(), StopwatchStatus::Recording);
        assert_eq!(sw.tick_period(), Some(Duration::from_millis(10)));

        for _ in 0..250 {
            sw.tick();
        }
        assert_eq!(sw.elapsed_ms(), 2500);

        assert!(sw.pause().is_some());
        assert_eq!(sw.status(), StopwatchStatus::Paused);
        sw.tick();
        assert_eq!(sw.elapsed_ms(), 2500);

        assert!(matches!(sw.reset(), Some(Event::StopwatchReset { .. })));
        assert_eq!(sw.elapsed_ms(), 0);
        assert!(!sw.is_running());
    }

    #[test]
    fn reset_while_running_stops() {
        let mut sw = Stopwatch::new();
        sw.start();
        sw.tick();
        sw.reset();
        assert_eq!(sw.status(), StopwatchStatus::Ready);
        sw.tick();
        assert_eq!(sw.elapsed_ms(), 0);
    }

    #[test]
    fn toggle_alternates() {
        let mut sw = Stopwatch::new();
        assert!(matches!(sw.toggle(), Some(Event::StopwatchStarted { .. })));
        assert!(matches!(sw.toggle(), Some(Event::StopwatchPaused { .. })));
    }
}
