//! Live clock with a single daily alarm.
//!
//! The caller feeds local wall-clock time into `tick()` once per second.
//! Ringing latches: once set it stays set until `stop()`, regardless of
//! how long ago the alarm minute was.

use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;
use crate::format;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Parse a strict 24-hour `HH:MM`.
pub fn parse_alarm_time(input: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidAlarmTime(input.to_string());
    let (h, m) = input.split_once(':').ok_or_else(invalid)?;
    let digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(h) || !digits(m) {
        return Err(invalid());
    }
    let hour: u32 = h.parse().map_err(|_| invalid())?;
    let minute: u32 = m.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Most recent occurrence of `alarm` if it lies in `(prev, now]`.
fn crossed(prev: NaiveDateTime, now: NaiveDateTime, alarm: NaiveTime) -> Option<NaiveDateTime> {
    if now <= prev {
        return None;
    }
    let today = now.date().and_time(alarm);
    let latest = if today <= now {
        today
    } else {
        today - TimeDelta::days(1)
    };
    (latest > prev).then_some(latest)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmClock {
    now: NaiveDateTime,
    alarm_time: NaiveTime,
    enabled: bool,
    ringing: bool,
    /// Previous tick instant, used to notice alarm minutes skipped over.
    last_tick: Option<NaiveDateTime>,
    /// Alarm occurrence that last rang; a stopped alarm stays quiet for
    /// the rest of that minute.
    fired_for: Option<NaiveDateTime>,
    catch_up_missed: bool,
}

impl AlarmClock {
    /// Mounted disabled, showing `now`.
    pub fn new(now: NaiveDateTime, alarm_time: NaiveTime, catch_up_missed: bool) -> Self {
        Self {
            now,
            alarm_time,
            enabled: false,
            ringing: false,
            last_tick: Some(now),
            fired_for: None,
            catch_up_missed,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn alarm_time(&self) -> NaiveTime {
        self.alarm_time
    }

    pub fn alarm_time_str(&self) -> String {
        format!("{:02}:{:02}", self.alarm_time.hour(), self.alarm_time.minute())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_ringing(&self) -> bool {
        self.ringing
    }

    pub fn clock_display(&self) -> String {
        format::clock(self.now)
    }

    pub fn date_display(&self) -> String {
        format::long_date(self.now)
    }

    pub fn tick_period(&self) -> Option<Duration> {
        Some(TICK_PERIOD)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the alarm time. Does not stop a ringing alarm.
    pub fn set_alarm_time(&mut self, input: &str) -> Result<(), ValidationError> {
        self.alarm_time = parse_alarm_time(input)?;
        Ok(())
    }

    /// Shift the alarm by whole hours, wrapping within the day.
    pub fn nudge_hours(&mut self, delta: i64) {
        self.alarm_time = self
            .alarm_time
            .overflowing_add_signed(TimeDelta::hours(delta))
            .0;
    }

    /// Shift the alarm by whole minutes, wrapping within the day.
    pub fn nudge_minutes(&mut self, delta: i64) {
        self.alarm_time = self
            .alarm_time
            .overflowing_add_signed(TimeDelta::minutes(delta))
            .0;
    }

    pub fn toggle_enabled(&mut self) -> Option<Event> {
        self.enabled = !self.enabled;
        Some(Event::AlarmToggled {
            enabled: self.enabled,
            alarm_time: self.alarm_time_str(),
            at: Utc::now(),
        })
    }

    pub fn stop(&mut self) -> Option<Event> {
        if !self.ringing {
            return None;
        }
        self.ringing = false;
        Some(Event::AlarmStopped { at: Utc::now() })
    }

    /// Refresh the clock and check the alarm.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<Event> {
        let prev = self.last_tick.replace(now);
        self.now = now;

        if !self.enabled || self.ringing {
            return None;
        }

        let occurrence = if format::hour_minute(now) == self.alarm_time_str() {
            Some((now.date().and_time(self.alarm_time), false))
        } else if self.catch_up_missed {
            prev.and_then(|p| crossed(p, now, self.alarm_time))
                .map(|o| (o, true))
        } else {
            None
        };
        let (occurrence, missed) = occurrence?;
        if self.fired_for == Some(occurrence) {
            return None;
        }

        let alarm = self.alarm_time_str();
        self.fired_for = Some(occurrence);
        self.ringing = true;
        tracing::info!(alarm_time = %alarm, missed, "alarm ringing");
        Some(Event::AlarmRinging {
            alarm_time: alarm,
            missed,
            at: Utc::now(),
        })
    }
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

    fn seven() -> NaiveTime {
        NaiveTime::from_hms_opt(7, 0, 0).unwrap()
    }

    #[test]
    fn parse_strict_hh_mm() {
        assert_eq!(parse_alarm_time("07:00").unwrap(), seven());
        assert_eq!(parse_alarm_time("23:59").unwrap().minute(), 59);
        for bad in ["7:00", "+1:00", "24:00", "12:60", "0700", "ab:cd", "07:00:00"] {
            assert!(parse_alarm_time(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn rings_at_minute_and_latches() {
        let mut alarm = AlarmClock::new(at(6, 59, 0), seven(), true);
        alarm.toggle_enabled();
        assert!(alarm.tick(at(6, 59, 59)).is_none());
        assert!(matches!(
            alarm.tick(at(7, 0, 0)),
            Some(Event::AlarmRinging { missed: false, .. })
        ));
        assert!(alarm.tick(at(7, 0, 1)).is_none());
        assert!(alarm.tick(at(7, 5, 0)).is_none());
        assert!(alarm.is_ringing());
        assert_eq!(alarm.clock_display(), "07:05:00");

        assert!(alarm.stop().is_some());
        assert!(alarm.stop().is_none());
        assert!(!alarm.is_ringing());
    }

    #[test]
    fn stop_inside_the_minute_stays_quiet() {
        let mut alarm = AlarmClock::new(at(6, 59, 59), seven(), true);
        alarm.toggle_enabled();
        assert!(alarm.tick(at(7, 0, 0)).is_some());
        alarm.stop();
        assert!(alarm.tick(at(7, 0, 1)).is_none());
        assert!(alarm.tick(at(7, 0, 59)).is_none());
        assert!(!alarm.is_ringing());
    }

    #[test]
    fn disabled_never_rings() {
        let mut alarm = AlarmClock::new(at(6, 59, 0), seven(), true);
        assert!(alarm.tick(at(7, 0, 0)).is_none());
        // enabling after the minute passed does not ring retroactively
        assert!(alarm.tick(at(7, 1, 0)).is_none());
        alarm.toggle_enabled();
        assert!(alarm.tick(at(7, 1, 1)).is_none());
    }

    #[test]
    fn enabling_inside_the_minute_rings() {
        let mut alarm = AlarmClock::new(at(7, 0, 10), seven(), false);
        alarm.toggle_enabled();
        assert!(alarm.tick(at(7, 0, 11)).is_some());
    }

    #[test]
    fn editing_time_does_not_stop_ring() {
        let mut alarm = AlarmClock::new(at(6, 59, 59), seven(), true);
        alarm.toggle_enabled();
        alarm.tick(at(7, 0, 0));
        alarm.set_alarm_time("08:30").unwrap();
        assert!(alarm.is_ringing());
        assert_eq!(alarm.alarm_time_str(), "08:30");
    }

    #[test]
    fn invalid_edit_keeps_previous_time() {
        let mut alarm = AlarmClock::new(at(6, 0, 0), seven(), true);
        assert!(alarm.set_alarm_time("25:00").is_err());
        assert_eq!(alarm.alarm_time_str(), "07:00");
    }

    #[test]
    fn suspended_tab_catches_up() {
        let mut alarm = AlarmClock::new(at(6, 58, 0), seven(), true);
        alarm.toggle_enabled();
        alarm.tick(at(6, 58, 1));
        assert!(matches!(
            alarm.tick(at(7, 3, 0)),
            Some(Event::AlarmRinging { missed: true, .. })
        ));
    }

    #[test]
    fn catch_up_can_be_disabled() {
        let mut alarm = AlarmClock::new(at(6, 58, 0), seven(), false);
        alarm.toggle_enabled();
        alarm.tick(at(6, 58, 1));
        assert!(alarm.tick(at(7, 3, 0)).is_none());
    }

    #[test]
    fn catch_up_across_midnight() {
        let late = NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(23, 50, 0)
            .unwrap();
        let mut alarm = AlarmClock::new(late, NaiveTime::from_hms_opt(0, 5, 0).unwrap(), true);
        alarm.toggle_enabled();
        assert!(alarm.tick(at(0, 10, 0)).is_some());
    }

    #[test]
    fn nudges_wrap() {
        let mut alarm = AlarmClock::new(at(6, 0, 0), NaiveTime::from_hms_opt(23, 59, 0).unwrap(), true);
        alarm.nudge_minutes(1);
        assert_eq!(alarm.alarm_time_str(), "00:00");
        alarm.nudge_hours(-1);
        assert_eq!(alarm.alarm_time_str(), "23:00");
    }
}
