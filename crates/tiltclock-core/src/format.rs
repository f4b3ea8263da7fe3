//! Display formatting for durations and wall-clock times.
//!
//! All arithmetic is integer division on the raw counters; nothing here
//! rounds.

use chrono::{NaiveDateTime, Timelike};

/// Zero-padded stopwatch fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwatchDisplay {
    pub minutes: String,
    pub seconds: String,
    pub hundredths: String,
}

impl std::fmt::Display for StopwatchDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}.{}", self.minutes, self.seconds, self.hundredths)
    }
}

/// Split elapsed milliseconds into minutes / seconds / hundredths.
/// Minutes are not wrapped at 60.
pub fn stopwatch(elapsed_ms: u64) -> StopwatchDisplay {
    let centis = elapsed_ms / 10;
    let minutes = centis / 6000;
    let seconds = (centis % 6000) / 100;
    let hundredths = centis % 100;
    StopwatchDisplay {
        minutes: format!("{minutes:02}"),
        seconds: format!("{seconds:02}"),
        hundredths: format!("{hundredths:02}"),
    }
}

/// `HH:MM:SS` when there is at least one hour, `MM:SS` otherwise.
pub fn countdown(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Render a raw digit buffer as `HH:MM:SS`, left-padding to six digits.
pub fn digit_entry(buffer: &str) -> String {
    let padded = format!("{buffer:0>6}");
    format!("{}:{}:{}", &padded[0..2], &padded[2..4], &padded[4..6])
}

/// 24-hour `HH:MM:SS`.
pub fn clock(now: NaiveDateTime) -> String {
    now.format("%H:%M:%S").to_string()
}

/// Minute-granularity key used for alarm comparison.
pub fn hour_minute(now: NaiveDateTime) -> String {
    format!("{:02}:{:02}", now.hour(), now.minute())
}

/// Long date line, e.g. `Sunday, October 18, 2026`.
pub fn long_date(now: NaiveDateTime) -> String {
    now.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn stopwatch_splits_fields() {
        let d = stopwatch(83_450);
        assert_eq!(d.minutes, "01");
        assert_eq!(d.seconds, "23");
        assert_eq!(d.hundredths, "45");
        assert_eq!(d.to_string(), "01:23.45");
    }

    #[test]
    fn stopwatch_minutes_grow_past_an_hour() {
        let d = stopwatch(61 * 60 * 1000);
        assert_eq!(d.minutes, "61");
        assert_eq!(d.seconds, "00");
    }

    #[test]
    fn stopwatch_truncates_sub_centisecond() {
        assert_eq!(stopwatch(19).hundredths, "01");
    }

    #[test]
    fn countdown_hides_zero_hours() {
        assert_eq!(countdown(75), "01:15");
        assert_eq!(countdown(3600 + 61), "01:01:01");
        assert_eq!(countdown(0), "00:00");
    }

    #[test]
    fn digit_entry_pads_left() {
        assert_eq!(digit_entry(""), "00:00:00");
        assert_eq!(digit_entry("5"), "00:00:05");
        assert_eq!(digit_entry("130045"), "13:00:45");
    }

    #[test]
    fn clock_strings() {
        let now = at(7, 5, 9);
        assert_eq!(clock(now), "07:05:09");
        assert_eq!(hour_minute(now), "07:05");
        assert_eq!(long_date(now), "Sunday, October 18, 2026");
    }
}
