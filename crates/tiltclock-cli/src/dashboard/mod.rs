//! Interactive terminal dashboard.
//!
//! Terminal resizes and the `r` key are the orientation signal. After the
//! settle delay the shell re-detects, and a changed mode unmounts the old
//! panel and mounts the new one. Weather results are tagged with the mount
//! generation that requested them, so a result for an unmounted panel is
//! dropped.

pub mod bell;
pub mod probe;
pub mod render;

use std::future;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use futures::StreamExt;
use tiltclock_core::{
    Config, ConnectivityProbe, Event, Haptics, Mode, MountContext, OrientationShell, Panel, Ticker,
    WeatherError, WeatherReport, WeatherService,
};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use bell::TerminalBell;
use probe::TerminalProbe;

const FRAME: Duration = Duration::from_millis(50);
pub const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(2);

type FetchResult = (u64, Result<WeatherReport, WeatherError>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Raw mode and the alternate screen for as long as the guard lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub async fn run(config: Config, probe: TerminalProbe) -> Result<(), Box<dyn std::error::Error>> {
    let service = Arc::new(WeatherService::from_config(&config)?);
    let connectivity = ConnectivityProbe::for_endpoint(service.endpoint(), CONNECTIVITY_TIMEOUT)?;
    let online = connectivity.check().await;
    tracing::info!(online, "initial connectivity");

    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel();
    let (net_tx, mut net_rx) = mpsc::unbounded_channel();
    let watcher = tokio::spawn(watch_connectivity(
        connectivity,
        config.connectivity_interval(),
        net_tx,
    ));

    let guard = TerminalGuard::enter()?;
    let mut dashboard = Dashboard::new(config, probe, service, fetch_tx, online);
    let mut out = io::stdout();
    let result = dashboard.event_loop(&mut out, &mut fetch_rx, &mut net_rx).await;

    watcher.abort();
    drop(guard);
    tracing::info!("dashboard stopped");
    result
}

async fn watch_connectivity(
    probe: ConnectivityProbe,
    every: Duration,
    tx: mpsc::UnboundedSender<bool>,
) {
    let mut interval = time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick is immediate and the initial state is already known.
    interval.tick().await;
    loop {
        interval.tick().await;
        if tx.send(probe.check().await).is_err() {
            break;
        }
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) {
    match ticker {
        Some(t) => t.tick().await,
        None => future::pending().await,
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => future::pending().await,
    }
}

struct Dashboard {
    config: Config,
    probe: TerminalProbe,
    shell: OrientationShell,
    panel: Panel,
    generation: u64,
    ticker: Option<Ticker>,
    settle_at: Option<Instant>,
    transition_done_at: Option<Instant>,
    online: bool,
    bell: TerminalBell,
    service: Arc<WeatherService>,
    fetch_tx: mpsc::UnboundedSender<FetchResult>,
    dirty: bool,
}

impl Dashboard {
    fn new(
        config: Config,
        probe: TerminalProbe,
        service: Arc<WeatherService>,
        fetch_tx: mpsc::UnboundedSender<FetchResult>,
        online: bool,
    ) -> Self {
        let shell = OrientationShell::from_probe(&probe, config.shell_timing());
        let bell = TerminalBell::new(config.haptics.enabled);
        let mode = shell.mode();
        let ctx = mount_context(&config, online);
        let (panel, event) = Panel::mount(mode, &ctx);
        tracing::info!(orientation = %shell.orientation(), mode = mode.label(), "panel mounted");

        let mut dashboard = Self {
            config,
            probe,
            shell,
            panel,
            generation: 0,
            ticker: None,
            settle_at: None,
            transition_done_at: None,
            online,
            bell,
            service,
            fetch_tx,
            dirty: true,
        };
        dashboard.dispatch(event);
        dashboard.sync_ticker();
        dashboard
    }

    async fn event_loop(
        &mut self,
        out: &mut Stdout,
        fetch_rx: &mut mpsc::UnboundedReceiver<FetchResult>,
        net_rx: &mut mpsc::UnboundedReceiver<bool>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut terminal_events = EventStream::new();
        let mut frame = time::interval(FRAME);
        frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                maybe = terminal_events.next() => match maybe {
                    Some(Ok(event)) => {
                        if self.on_terminal(event) == Flow::Quit {
                            break;
                        }
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                () = next_tick(&mut self.ticker) => self.on_tick(),
                () = wait_until(self.settle_at) => self.on_settle(),
                () = wait_until(self.transition_done_at) => {
                    self.transition_done_at = None;
                    self.shell.finish_transition();
                    self.dirty = true;
                }
                Some((generation, result)) = fetch_rx.recv() => self.on_fetch(generation, result),
                Some(online) = net_rx.recv() => self.on_connectivity(online),
                _ = frame.tick(), if self.dirty => {
                    render::draw(out, self.probe.size(), &self.shell, &self.panel)?;
                    self.dirty = false;
                }
            }
        }
        Ok(())
    }

    // ── Signals ──────────────────────────────────────────────────────

    fn on_terminal(&mut self, event: TermEvent) -> Flow {
        match event {
            TermEvent::Key(key) => self.on_key(key),
            TermEvent::Resize(cols, rows) => {
                self.probe.resize(cols, rows);
                self.orientation_signal();
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit
            }
            KeyCode::Char('r') => {
                self.probe.rotate();
                tracing::info!(angle = self.probe.angle(), "rotated");
                self.orientation_signal();
                return Flow::Continue;
            }
            _ => {}
        }
        let event = panel_key(&mut self.panel, key.code);
        self.dispatch(event);
        self.sync_ticker();
        self.dirty = true;
        Flow::Continue
    }

    /// Restart the settle timer; bursts of signals collapse into one settle.
    fn orientation_signal(&mut self) {
        let delay = self.shell.signal();
        self.settle_at = Some(Instant::now() + delay);
        // A pending clear from the previous settle must not undim this one.
        self.transition_done_at = None;
        self.dirty = true;
    }

    fn on_settle(&mut self) {
        self.settle_at = None;
        let (event, transition) = self.shell.settle(&self.probe);
        self.dispatch(Some(event));
        let mode = self.shell.mode();
        if mode != self.panel.mode() {
            self.remount(mode);
        }
        self.transition_done_at = Some(Instant::now() + transition);
    }

    fn on_tick(&mut self) {
        let event = self.panel.tick(Local::now().naive_local());
        self.dispatch(event);
        self.sync_ticker();
        self.dirty = true;
    }

    fn on_fetch(&mut self, generation: u64, result: Result<WeatherReport, WeatherError>) {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "dropping stale weather result");
            return;
        }
        if let Panel::Weather(weather) = &mut self.panel {
            let event = weather.complete_fetch(result);
            self.dispatch(Some(event));
        }
    }

    fn on_connectivity(&mut self, online: bool) {
        if online == self.online {
            return;
        }
        tracing::info!(online, "connectivity changed");
        self.online = online;
        if let Panel::Weather(weather) = &mut self.panel {
            let events = weather.set_online(online);
            self.dispatch(events);
        }
    }

    // ── Panel lifecycle ──────────────────────────────────────────────

    fn remount(&mut self, mode: Mode) {
        self.generation += 1;
        let (panel, event) = Panel::mount(mode, &mount_context(&self.config, self.online));
        tracing::info!(mode = mode.label(), generation = self.generation, "panel mounted");
        self.panel = panel;
        self.dispatch(event);
        self.sync_ticker();
    }

    fn sync_ticker(&mut self) {
        let period = self.panel.tick_period();
        if Ticker::sync(&mut self.ticker, period) {
            tracing::debug!(?period, "tick source changed");
        }
    }

    fn dispatch(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            tracing::debug!(?event, "event");
            if let Some(pattern) = event.haptic() {
                self.bell.vibrate(&pattern);
            }
            if matches!(event, Event::WeatherFetchStarted { .. }) {
                self.spawn_fetch();
            }
            self.dirty = true;
        }
    }

    fn spawn_fetch(&self) {
        let service = Arc::clone(&self.service);
        let tx = self.fetch_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = service.fetch().await;
            // The receiver is gone only once the dashboard has exited.
            let _ = tx.send((generation, result));
        });
    }
}

fn mount_context(config: &Config, online: bool) -> MountContext {
    MountContext {
        now: Local::now().naive_local(),
        alarm_time: config.alarm_time(),
        catch_up_missed: config.alarm.catch_up_missed,
        online,
    }
}

/// Apply a key to the mounted panel.
fn panel_key(panel: &mut Panel, code: KeyCode) -> Option<Event> {
    match (panel, code) {
        (Panel::Stopwatch(sw), KeyCode::Char(' ')) => sw.toggle(),
        (Panel::Stopwatch(sw), KeyCode::Char('x')) => sw.reset(),

        (Panel::Timer(cd), KeyCode::Char(d)) if d.is_ascii_digit() => {
            cd.press_digit(d);
            None
        }
        (Panel::Timer(cd), KeyCode::Backspace) => {
            cd.backspace();
            None
        }
        (Panel::Timer(cd), KeyCode::Enter) => cd.start(),
        (Panel::Timer(cd), KeyCode::Char(' ')) => cd.toggle(),
        (Panel::Timer(cd), KeyCode::Char('x')) => cd.reset(),

        (Panel::Alarm(alarm), KeyCode::Char('e')) => alarm.toggle_enabled(),
        (Panel::Alarm(alarm), KeyCode::Char('s')) => alarm.stop(),
        (Panel::Alarm(alarm), KeyCode::Char('h')) => {
            alarm.nudge_hours(1);
            None
        }
        (Panel::Alarm(alarm), KeyCode::Char('H')) => {
            alarm.nudge_hours(-1);
            None
        }
        (Panel::Alarm(alarm), KeyCode::Char('m')) => {
            alarm.nudge_minutes(1);
            None
        }
        (Panel::Alarm(alarm), KeyCode::Char('M')) => {
            alarm.nudge_minutes(-1);
            None
        }

        (Panel::Weather(weather), KeyCode::Char('f')) => weather.begin_fetch(),

        _ => None,
    }
}
