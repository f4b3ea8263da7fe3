//! Countdown timer with HHMMSS digit-pad entry.
//!
//! ## Modes
//!
//! ```text
//! Entry (total == 0) --start--> Running <--pause/resume--> Paused
//!        ^                         |
//!        +--------reset------------+--> Complete (remaining == 0)
//! ```
//!
//! The six digits are read as three independent pairs, so `"009900"`
//! means 99 minutes, not 1h39m displayed differently; no carry is applied.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;
use crate::format;

pub const MAX_DIGITS: usize = 6;

/// Parse a digit buffer of up to six digits as left-padded `HHMMSS`.
pub fn parse_entry(buffer: &str) -> Result<u64, ValidationError> {
    if let Some(bad) = buffer.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ValidationError::InvalidDigit(bad));
    }
    if buffer.len() > MAX_DIGITS {
        return Err(ValidationError::TooManyDigits(buffer.to_string()));
    }
    let padded = format!("{buffer:0>6}");
    let field = |range: std::ops::Range<usize>| -> u64 {
        padded[range]
            .bytes()
            .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
    };
    let hours = field(0..2);
    let minutes = field(2..4);
    let seconds = field(4..6);
    Ok(hours * 3600 + minutes * 60 + seconds)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Countdown {
    total_secs: u64,
    remaining_secs: u64,
    running: bool,
    buffer: String,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Entry mode shows the digit pad; anything else shows the progress ring.
    pub fn in_entry_mode(&self) -> bool {
        self.total_secs == 0
    }

    pub fn is_complete(&self) -> bool {
        self.total_secs > 0 && self.remaining_secs == 0
    }

    /// 0.0 .. 1.0 fraction of the duration already consumed.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        (self.total_secs - self.remaining_secs) as f64 / self.total_secs as f64
    }

    pub fn remaining_display(&self) -> String {
        format::countdown(self.remaining_secs)
    }

    pub fn entry_display(&self) -> String {
        format::digit_entry(&self.buffer)
    }

    pub fn tick_period(&self) -> Option<Duration> {
        (self.running && self.remaining_secs > 0).then(|| Duration::from_secs(1))
    }

    // ── Entry ────────────────────────────────────────────────────────

    /// Append a digit. Returns false when the digit was not accepted.
    pub fn press_digit(&mut self, digit: char) -> bool {
        if !self.in_entry_mode() || !digit.is_ascii_digit() || self.buffer.len() >= MAX_DIGITS {
            return false;
        }
        self.buffer.push(digit);
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.in_entry_mode() && self.buffer.pop().is_some()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if !self.in_entry_mode() || self.buffer.is_empty() {
            return None;
        }
        // The buffer only ever holds digits, so parsing cannot fail here.
        let total = parse_entry(&self.buffer).ok()?;
        if total == 0 {
            return None;
        }
        self.total_secs = total;
        self.remaining_secs = total;
        self.running = true;
        tracing::debug!(total_secs = total, "countdown started");
        Some(Event::CountdownStarted {
            total_secs: total,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::CountdownPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.running || self.in_entry_mode() || self.remaining_secs == 0 {
            return None;
        }
        self.running = true;
        Some(Event::CountdownResumed {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Start from entry mode, otherwise pause/resume.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.in_entry_mode() {
            self.start()
        } else if self.running {
            self.pause()
        } else {
            self.resume()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.total_secs = 0;
        self.remaining_secs = 0;
        self.running = false;
        self.buffer.clear();
        Some(Event::CountdownReset { at: Utc::now() })
    }

    /// One-second step. Returns `CountdownCompleted` exactly once, on the
    /// tick that reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs > 0 {
            return None;
        }
        self.running = false;
        tracing::info!(total_secs = self.total_secs, "countdown complete");
        Some(Event::CountdownCompleted {
            total_secs: self.total_secs,
            at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entered(digits: &str) -> Countdown {
        let mut cd = Countdown::new();
        for d in digits.chars() {
            cd.press_digit(d);
        }
        cd
    }

    #[test]
    fn parse_examples() {
        assert_eq!(parse_entry("130045"), Ok(46845));
        assert_eq!(parse_entry("5"), Ok(5));
        assert_eq!(parse_entry(""), Ok(0));
        // 99 literal minutes, no carry
        assert_eq!(parse_entry("9900"), Ok(99 * 60));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(parse_entry("12a"), Err(ValidationError::InvalidDigit('a')));
        assert_eq!(
            parse_entry("1234567"),
            Err(ValidationError::TooManyDigits("1234567".into()))
        );
    }

    #[test]
    fn buffer_caps_at_six_digits() {
        let mut cd = entered("1234567");
        assert_eq!(cd.buffer(), "123456");
        assert!(!cd.press_digit('8'));
        assert!(!cd.press_digit('x'));
        assert!(cd.backspace());
        assert_eq!(cd.buffer(), "12345");
    }

    #[test]
    fn start_requires_nonzero_entry() {
        let mut cd = Countdown::new();
        assert!(cd.start().is_none());
        let mut zeros = entered("000");
        assert!(zeros.start().is_none());
        assert!(zeros.in_entry_mode());
        assert_eq!(zeros.buffer(), "000");
    }

    #[test]
    fn runs_to_completion_once() {
        let mut cd = entered("3");
        assert!(cd.start().is_some());
        assert!(!cd.in_entry_mode());
        assert!(!cd.press_digit('1'));

        assert!(cd.tick().is_none());
        assert!(cd.tick().is_none());
        assert!(matches!(cd.tick(), Some(Event::CountdownCompleted { total_secs: 3, .. })));
        assert!(!cd.is_running());
        assert!(cd.is_complete());
        assert_eq!(cd.progress(), 1.0);

        assert!(cd.tick().is_none());
        assert_eq!(cd.remaining_secs(), 0);
        assert!(cd.resume().is_none());
        assert!(cd.tick_period().is_none());
    }

    #[test]
    fn pause_keeps_remaining() {
        let mut cd = entered("10");
        cd.start();
        cd.tick();
        cd.tick();
        assert!(cd.pause().is_some());
        cd.tick();
        assert_eq!(cd.remaining_secs(), 8);
        assert!((cd.progress() - 0.2).abs() < f64::EPSILON);
        assert!(cd.resume().is_some());
        cd.tick();
        assert_eq!(cd.remaining_secs(), 7);
    }

    #[test]
    fn reset_returns_to_entry() {
        let mut cd = entered("90");
        cd.start();
        cd.tick();
        cd.reset();
        assert!(cd.in_entry_mode());
        assert_eq!(cd.buffer(), "");
        assert_eq!(cd.remaining_secs(), 0);
        assert_eq!(cd.progress(), 0.0);
        assert_eq!(cd.entry_display(), "00:00:00");
    }

    #[test]
    fn toggle_drives_lifecycle() {
        let mut cd = entered("100");
        assert!(matches!(cd.toggle(), Some(Event::CountdownStarted { total_secs: 60, .. })));
        assert!(matches!(cd.toggle(), Some(Event::CountdownPaused { .. })));
        assert!(matches!(cd.toggle(), Some(Event::CountdownResumed { .. })));
        assert_eq!(cd.remaining_display(), "01:00");
    }
}
