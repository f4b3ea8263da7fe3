//! Weather panel state machine.
//!
//! ```text
//! Loading ──ok──> Report
//!    └───err───> Report (demo) + error
//! Report ──refresh/retry──> Loading
//! ```
//!
//! Offline supersedes every other view. The panel never performs I/O;
//! the caller runs [`WeatherService::fetch`] after `begin_fetch` and hands
//! the result to `complete_fetch`.

mod connectivity;
mod geolocation;
mod report;
mod service;

pub use connectivity::ConnectivityProbe;
pub use geolocation::{Coordinates, Geolocator};
pub use report::{kmh_from_ms, parse_response, WeatherIcon, WeatherReport};
pub use service::{WeatherQuery, WeatherService};

use chrono::Utc;

use crate::error::WeatherError;
use crate::events::Event;

/// What the panel should draw.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherView<'a> {
    Offline,
    Loading,
    Report {
        report: &'a WeatherReport,
        /// The report is the demo fallback.
        demo: bool,
        error: Option<&'a str>,
    },
}

#[derive(Debug, Clone)]
pub struct WeatherPanel {
    report: Option<WeatherReport>,
    loading: bool,
    error: Option<String>,
    online: bool,
}

impl WeatherPanel {
    pub fn new(online: bool) -> Self {
        Self {
            report: None,
            loading: false,
            error: None,
            online,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn view(&self) -> WeatherView<'_> {
        if !self.online {
            return WeatherView::Offline;
        }
        if self.loading {
            return WeatherView::Loading;
        }
        match &self.report {
            Some(report) => WeatherView::Report {
                report,
                demo: self.error.is_some(),
                error: self.error.as_deref(),
            },
            None => WeatherView::Loading,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter `Loading`. Returns `None` (and changes nothing) while a fetch
    /// is already in flight or while offline; callers start a fetch only
    /// when this returns an event.
    pub fn begin_fetch(&mut self) -> Option<Event> {
        if self.loading || !self.online {
            return None;
        }
        self.loading = true;
        self.error = None;
        Some(Event::WeatherFetchStarted { at: Utc::now() })
    }

    /// Apply a fetch result. Failures install the demo report so the panel
    /// always has something to show.
    pub fn complete_fetch(&mut self, result: Result<WeatherReport, WeatherError>) -> Event {
        self.loading = false;
        match result {
            Ok(report) => {
                let event = Event::WeatherUpdated {
                    location: report.location.clone(),
                    temperature: report.temperature,
                    at: Utc::now(),
                };
                self.report = Some(report);
                self.error = None;
                event
            }
            Err(e) => {
                tracing::warn!(error = %e, "weather fetch failed, showing demo data");
                let message = e.to_string();
                self.report = Some(WeatherReport::demo());
                self.error = Some(message.clone());
                Event::WeatherFailed {
                    error: message,
                    at: Utc::now(),
                }
            }
        }
    }

    /// Mirror a connectivity signal. Coming back online starts a fetch, so
    /// the returned events may include `WeatherFetchStarted`.
    pub fn set_online(&mut self, online: bool) -> Vec<Event> {
        if online == self.online {
            return Vec::new();
        }
        self.online = online;
        let mut events = vec![Event::ConnectivityChanged {
            online,
            at: Utc::now(),
        }];
        if online {
            events.extend(self.begin_fetch());
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live() -> WeatherReport {
        WeatherReport {
            location: "Oslo, NO".into(),
            temperature: 3,
            condition: "Snow".into(),
            description: "light snow".into(),
            humidity: 90,
            wind_speed: 11,
        }
    }

    #[test]
    fn success_clears_error() {
        let mut panel = WeatherPanel::new(true);
        assert!(panel.begin_fetch().is_some());
        assert_eq!(panel.view(), WeatherView::Loading);

        let ev = panel.complete_fetch(Ok(live()));
        assert!(matches!(ev, Event::WeatherUpdated { temperature: 3, .. }));
        assert!(panel.error().is_none());
        assert!(matches!(panel.view(), WeatherView::Report { demo: false, error: None, .. }));
    }

    #[test]
    fn failure_installs_demo_and_error() {
        let mut panel = WeatherPanel::new(true);
        panel.begin_fetch();
        panel.complete_fetch(Err(WeatherError::Status(401)));
        assert_eq!(panel.report(), Some(&WeatherReport::demo()));
        assert_eq!(panel.error(), Some("Weather API error: 401"));
        match panel.view() {
            WeatherView::Report { report, demo, error } => {
                assert!(demo);
                assert_eq!(report.location, "Demo Location");
                assert_eq!(error, Some("Weather API error: 401"));
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn retry_after_failure_goes_back_to_loading() {
        let mut panel = WeatherPanel::new(true);
        panel.begin_fetch();
        panel.complete_fetch(Err(WeatherError::Decode("bad".into())));
        assert!(panel.begin_fetch().is_some());
        assert!(panel.error().is_none());
        assert_eq!(panel.view(), WeatherView::Loading);
    }

    #[test]
    fn repeat_triggers_ignored_while_loading() {
        let mut panel = WeatherPanel::new(true);
        assert!(panel.begin_fetch().is_some());
        assert!(panel.begin_fetch().is_none());
        panel.complete_fetch(Ok(live()));
        assert!(panel.begin_fetch().is_some());
    }

    #[test]
    fn offline_supersedes_and_suppresses_fetch() {
        let mut panel = WeatherPanel::new(false);
        assert!(panel.begin_fetch().is_none());
        assert_eq!(panel.view(), WeatherView::Offline);

        let events = panel.set_online(true);
        assert!(matches!(events[0], Event::ConnectivityChanged { online: true, .. }));
        assert!(matches!(events[1], Event::WeatherFetchStarted { .. }));
        assert!(panel.is_loading());

        panel.complete_fetch(Ok(live()));
        let events = panel.set_online(false);
        assert_eq!(events.len(), 1);
        assert_eq!(panel.view(), WeatherView::Offline);
        assert!(panel.set_online(false).is_empty());
    }

    #[test]
    fn reconnect_during_flight_does_not_double_fetch() {
        let mut panel = WeatherPanel::new(true);
        panel.begin_fetch();
        panel.set_online(false);
        let events = panel.set_online(true);
        assert_eq!(events.len(), 1);
    }
}
