//! # tiltclock Core Library
//!
//! Core logic for tiltclock, a four-mode clock widget whose active panel
//! is chosen by device orientation. The CLI is a thin terminal layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Panels**: alarm clock, stopwatch, countdown timer, weather. Each is a
//!   synchronous state machine; the caller invokes `tick()` at the panel's
//!   `tick_period()` and applies user commands.
//! - **Orientation shell**: resolves the orientation from a platform probe
//!   and selects exactly one panel.
//! - **Weather pipeline**: geolocation with default-city fallback, a single
//!   HTTP request, and demo data on failure.
//! - **Events**: every state change yields an [`Event`], which maps to an
//!   optional haptic pattern.
//!
//! ## Key Components
//!
//! - [`Panel`]: the mounted panel variant
//! - [`OrientationShell`]: orientation tracking and transition flag
//! - [`WeatherService`]: the fetch pipeline
//! - [`Config`]: application configuration

pub mod error;
pub mod events;
pub mod format;
pub mod haptics;
pub mod orientation;
pub mod panels;
pub mod storage;
pub mod tick;

pub use error::{ConfigError, CoreError, GeolocationError, ValidationError, WeatherError};
pub use events::Event;
pub use haptics::{HapticPattern, Haptics, NoHaptics};
pub use orientation::{detect, Backdrop, Mode, Orientation, OrientationProbe, OrientationShell, ShellTiming};
pub use panels::weather::{
    ConnectivityProbe, Coordinates, Geolocator, WeatherIcon, WeatherReport, WeatherService,
};
pub use panels::{AlarmClock, Countdown, MountContext, Panel, Stopwatch, WeatherPanel, WeatherView};
pub use storage::Config;
pub use tick::Ticker;
