//! Periodic tick source for the mounted panel.
//!
//! A `Ticker` is plain data owned by whoever drives the panel. Dropping it
//! stops the ticks; there is no background task to leak.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Interval,
}

impl Ticker {
    /// First tick fires one `period` from now.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { period, interval }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Keep `slot` in step with `period`: rebuild when the period changes,
    /// clear when it goes away. Returns true when the slot changed.
    pub fn sync(slot: &mut Option<Ticker>, period: Option<Duration>) -> bool {
        match (slot.as_ref().map(Ticker::period), period) {
            (current, wanted) if current == wanted => false,
            (_, Some(p)) => {
                *slot = Some(Ticker::new(p));
                true
            }
            (_, None) => {
                *slot = None;
                true
            }
        }
    }
}
