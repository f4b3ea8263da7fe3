//! Orientation detection and the shell that picks the active panel.
//!
//! ## Signal handling
//!
//! ```text
//! signal() -> transitioning, wait settle_delay
//!   settle(probe) -> recompute, emit OrientationSettled, wait transition
//!     finish_transition() -> not transitioning
//! ```
//!
//! A signal that arrives while waiting restarts the settle wait; the
//! caller owns the timers.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Legacy rotation angle that marks landscape-primary.
const LANDSCAPE_PRIMARY_ANGLE: i32 = 90;
/// Legacy rotation angle that marks portrait-secondary.
const PORTRAIT_SECONDARY_ANGLE: i32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    PortraitPrimary,
    LandscapePrimary,
    PortraitSecondary,
    LandscapeSecondary,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::PortraitPrimary,
        Orientation::LandscapePrimary,
        Orientation::PortraitSecondary,
        Orientation::LandscapeSecondary,
    ];

    /// Parse a platform orientation type string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "portrait-primary" => Some(Orientation::PortraitPrimary),
            "landscape-primary" => Some(Orientation::LandscapePrimary),
            "portrait-secondary" => Some(Orientation::PortraitSecondary),
            "landscape-secondary" => Some(Orientation::LandscapeSecondary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::PortraitPrimary => "portrait-primary",
            Orientation::LandscapePrimary => "landscape-primary",
            Orientation::PortraitSecondary => "portrait-secondary",
            Orientation::LandscapeSecondary => "landscape-secondary",
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Orientation::PortraitPrimary => Mode::Alarm,
            Orientation::LandscapePrimary => Mode::Stopwatch,
            Orientation::PortraitSecondary => Mode::Timer,
            Orientation::LandscapeSecondary => Mode::Weather,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The panel a given orientation selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Alarm,
    Stopwatch,
    Timer,
    Weather,
}

impl Mode {
    /// Unrecognized strings fall back to the alarm panel.
    pub fn from_orientation_type(s: &str) -> Self {
        Orientation::parse(s).map_or(Mode::Alarm, |o| o.mode())
    }

    /// Indicator label.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Alarm => "Alarm",
            Mode::Stopwatch => "Stopwatch",
            Mode::Timer => "Timer",
            Mode::Weather => "Weather",
        }
    }

    /// Indicator glyph.
    pub fn glyph(&self) -> &'static str {
        match self {
            Mode::Alarm => "◷",
            Mode::Stopwatch => "↻",
            Mode::Timer => "⧗",
            Mode::Weather => "☁",
        }
    }

    pub fn backdrop(&self) -> Backdrop {
        match self {
            Mode::Alarm => Backdrop::SlateBlue,
            Mode::Stopwatch => Backdrop::Black,
            Mode::Timer => Backdrop::Red,
            Mode::Weather => Backdrop::SkyBlue,
        }
    }
}

/// Background treatment behind the active panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backdrop {
    SlateBlue,
    Black,
    Red,
    SkyBlue,
}

/// Resolve an orientation from the platform's signals.
///
/// `primary` is the orientation API's type string when that API exists.
/// Without it the window shape decides portrait vs landscape and the
/// legacy rotation angle picks primary vs secondary. An unrecognized
/// primary string resolves to portrait-primary.
pub fn detect(primary: Option<&str>, width: u32, height: u32, angle: i32) -> Orientation {
    if let Some(kind) = primary {
        return Orientation::parse(kind).unwrap_or(Orientation::PortraitPrimary);
    }
    if width > height {
        if angle == LANDSCAPE_PRIMARY_ANGLE {
            Orientation::LandscapePrimary
        } else {
            Orientation::LandscapeSecondary
        }
    } else if angle == PORTRAIT_SECONDARY_ANGLE {
        Orientation::PortraitSecondary
    } else {
        Orientation::PortraitPrimary
    }
}

/// Platform orientation capability.
pub trait OrientationProbe {
    /// Orientation API type string, `None` when the API is absent.
    fn primary(&self) -> Option<String>;

    /// Window width and height.
    fn window_size(&self) -> (u32, u32);

    /// Legacy rotation angle in degrees (0, 90, 180, -90).
    fn rotation_angle(&self) -> i32;

    fn detect(&self) -> Orientation {
        let (width, height) = self.window_size();
        detect(self.primary().as_deref(), width, height, self.rotation_angle())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellTiming {
    pub settle_delay: Duration,
    pub transition: Duration,
}

impl Default for ShellTiming {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(100),
            transition: Duration::from_millis(150),
        }
    }
}

/// Tracks the active orientation and the transition flag.
#[derive(Debug, Clone)]
pub struct OrientationShell {
    orientation: Orientation,
    transitioning: bool,
    timing: ShellTiming,
}

impl OrientationShell {
    pub fn new(initial: Orientation, timing: ShellTiming) -> Self {
        Self {
            orientation: initial,
            transitioning: false,
            timing,
        }
    }

    /// Initial orientation taken straight from the probe, no transition.
    pub fn from_probe(probe: &dyn OrientationProbe, timing: ShellTiming) -> Self {
        Self::new(probe.detect(), timing)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn mode(&self) -> Mode {
        self.orientation.mode()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// An orientation-change or resize signal arrived. Returns how long to
    /// wait before calling `settle`.
    pub fn signal(&mut self) -> Duration {
        self.transitioning = true;
        self.timing.settle_delay
    }

    /// Recompute after the settle delay. Returns the settle event and how
    /// long to wait before `finish_transition`.
    pub fn settle(&mut self, probe: &dyn OrientationProbe) -> (Event, Duration) {
        let next = probe.detect();
        let changed = next != self.orientation;
        if changed {
            tracing::info!(from = %self.orientation, to = %next, "orientation changed");
        }
        self.orientation = next;
        let event = Event::OrientationSettled {
            orientation: next,
            mode: next.mode(),
            changed,
            at: Utc::now(),
        };
        (event, self.timing.transition)
    }

    pub fn finish_transition(&mut self) {
        self.transitioning = false;
    }
}
