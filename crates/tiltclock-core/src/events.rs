use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::haptics::HapticPattern;
use crate::orientation::{Mode, Orientation};

/// Every state change in a panel or the shell produces an Event.
/// The front end maps them to haptics and log lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    StopwatchStarted {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchReset {
        at: DateTime<Utc>,
    },
    CountdownStarted {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    CountdownPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CountdownResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CountdownReset {
        at: DateTime<Utc>,
    },
    CountdownCompleted {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    AlarmToggled {
        enabled: bool,
        alarm_time: String,
        at: DateTime<Utc>,
    },
    AlarmRinging {
        alarm_time: String,
        /// True when the alarm minute was detected after the fact (tick gap).
        missed: bool,
        at: DateTime<Utc>,
    },
    AlarmStopped {
        at: DateTime<Utc>,
    },
    WeatherFetchStarted {
        at: DateTime<Utc>,
    },
    WeatherUpdated {
        location: String,
        temperature: i32,
        at: DateTime<Utc>,
    },
    /// Fetch failed; the panel is showing demo data.
    WeatherFailed {
        error: String,
        at: DateTime<Utc>,
    },
    ConnectivityChanged {
        online: bool,
        at: DateTime<Utc>,
    },
    /// Emitted after every settle, whether or not the mode changed.
    OrientationSettled {
        orientation: Orientation,
        mode: Mode,
        changed: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Vibration that accompanies this event, if any.
    pub fn haptic(&self) -> Option<HapticPattern> {
        match self {
            Event::StopwatchStarted { .. }
            | Event::StopwatchPaused { .. }
            | Event::CountdownPaused { .. } => Some(HapticPattern::pulse(30)),
            Event::CountdownStarted { .. }
            | Event::CountdownResumed { .. }
            | Event::OrientationSettled { .. } => Some(HapticPattern::pulse(50)),
            Event::StopwatchReset { .. } | Event::CountdownReset { .. } => {
                Some(HapticPattern::sequence(&[50, 50, 50]))
            }
            Event::CountdownCompleted { .. } => {
                Some(HapticPattern::sequence(&[500, 200, 500, 200, 500]))
            }
            Event::AlarmRinging { .. } => Some(HapticPattern::sequence(&[200, 100, 200, 100, 200])),
            Event::AlarmToggled { .. }
            | Event::AlarmStopped { .. }
            | Event::WeatherFetchStarted { .. }
            | Event::WeatherUpdated { .. }
            | Event::WeatherFailed { .. }
            | Event::ConnectivityChanged { .. } => None,
        }
    }
}
