//! The four panels and the single variant type the shell mounts.

pub mod alarm;
pub mod countdown;
pub mod stopwatch;
pub mod weather;

pub use alarm::AlarmClock;
pub use countdown::Countdown;
pub use stopwatch::{Stopwatch, StopwatchStatus};
pub use weather::{WeatherPanel, WeatherView};

use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};

use crate::events::Event;
use crate::orientation::Mode;

/// Inputs a freshly mounted panel needs.
#[derive(Debug, Clone)]
pub struct MountContext {
    pub now: NaiveDateTime,
    pub alarm_time: NaiveTime,
    pub catch_up_missed: bool,
    pub online: bool,
}

/// Exactly one panel is mounted at a time. Dropping it drops all of its
/// state; nothing carries over between mounts.
#[derive(Debug, Clone)]
pub enum Panel {
    Alarm(AlarmClock),
    Stopwatch(Stopwatch),
    Timer(Countdown),
    Weather(WeatherPanel),
}

impl Panel {
    /// Build the panel for `mode`. The weather panel starts its first
    /// fetch on mount, reported through the returned event.
    pub fn mount(mode: Mode, ctx: &MountContext) -> (Self, Option<Event>) {
        match mode {
            Mode::Alarm => (
                Panel::Alarm(AlarmClock::new(ctx.now, ctx.alarm_time, ctx.catch_up_missed)),
                None,
            ),
            Mode::Stopwatch => (Panel::Stopwatch(Stopwatch::new()), None),
            Mode::Timer => (Panel::Timer(Countdown::new()), None),
            Mode::Weather => {
                let mut panel = WeatherPanel::new(ctx.online);
                let event = panel.begin_fetch();
                (Panel::Weather(panel), event)
            }
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Panel::Alarm(_) => Mode::Alarm,
            Panel::Stopwatch(_) => Mode::Stopwatch,
            Panel::Timer(_) => Mode::Timer,
            Panel::Weather(_) => Mode::Weather,
        }
    }

    /// Cadence of the panel's tick source, `None` when it needs none.
    pub fn tick_period(&self) -> Option<Duration> {
        match self {
            Panel::Alarm(p) => p.tick_period(),
            Panel::Stopwatch(p) => p.tick_period(),
            Panel::Timer(p) => p.tick_period(),
            Panel::Weather(_) => None,
        }
    }

    pub fn tick(&mut self, now: NaiveDateTime) -> Option<Event> {
        match self {
            Panel::Alarm(p) => p.tick(now),
            Panel::Stopwatch(p) => {
                p.tick();
                None
            }
            Panel::Timer(p) => p.tick(),
            Panel::Weather(_) => None,
        }
    }
}
