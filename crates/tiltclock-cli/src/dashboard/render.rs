//! Text layout for each panel and the crossterm drawing pass.

use std::io::{self, Write};

use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use tiltclock_core::panels::StopwatchStatus;
use tiltclock_core::{
    AlarmClock, Backdrop, Countdown, Mode, OrientationShell, Panel, Stopwatch, WeatherPanel,
    WeatherView,
};

const PROGRESS_WIDTH: usize = 30;

pub fn backdrop_color(backdrop: Backdrop) -> Color {
    match backdrop {
        Backdrop::SlateBlue => Color::Rgb { r: 30, g: 41, b: 82 },
        Backdrop::Black => Color::Black,
        Backdrop::Red => Color::Rgb { r: 153, g: 27, b: 27 },
        Backdrop::SkyBlue => Color::Rgb { r: 37, g: 99, b: 235 },
    }
}

pub fn indicator(mode: Mode) -> String {
    format!("{} {}", mode.glyph(), mode.label())
}

pub fn panel_lines(panel: &Panel) -> Vec<String> {
    match panel {
        Panel::Alarm(p) => alarm_lines(p),
        Panel::Stopwatch(p) => stopwatch_lines(p),
        Panel::Timer(p) => countdown_lines(p),
        Panel::Weather(p) => weather_lines(p),
    }
}

pub fn alarm_lines(alarm: &AlarmClock) -> Vec<String> {
    let mut lines = vec![
        alarm.clock_display(),
        alarm.date_display(),
        String::new(),
        format!(
            "Set Alarm  {}  [{}]",
            alarm.alarm_time_str(),
            if alarm.is_enabled() { "ON" } else { "OFF" }
        ),
    ];
    if alarm.is_enabled() {
        lines.push(format!("Alarm set for {}", alarm.alarm_time_str()));
    }
    if alarm.is_ringing() {
        lines.push(String::new());
        lines.push("!! ALARM !!  press s to stop".to_string());
    }
    lines.push(String::new());
    lines.push("e on/off  h/H hour  m/M minute  s stop".to_string());
    lines
}

pub fn stopwatch_lines(stopwatch: &Stopwatch) -> Vec<String> {
    let display = stopwatch.display();
    let status = match stopwatch.status() {
        StopwatchStatus::Ready => "Ready",
        StopwatchStatus::Recording => "Recording",
        StopwatchStatus::Paused => "Paused",
    };
    vec![
        format!("{:02}:{:02}", display.minutes, display.seconds),
        format!(".{:02}", display.hundredths),
        String::new(),
        status.to_string(),
        String::new(),
        "space start/pause  x reset".to_string(),
    ]
}

pub fn progress_bar(progress: f64) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * PROGRESS_WIDTH as f64) + 0.5).floor() as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        ((progress * 100.0) + 0.5).floor() as u32
    )
}

pub fn countdown_lines(countdown: &Countdown) -> Vec<String> {
    if countdown.in_entry_mode() {
        return vec![
            countdown.entry_display(),
            "Hours : Minutes : Seconds".to_string(),
            String::new(),
            "0-9 enter digits  backspace delete  enter start".to_string(),
        ];
    }
    let mut lines = vec![progress_bar(countdown.progress()), String::new()];
    lines.push(countdown.remaining_display());
    if countdown.is_complete() {
        lines.push("Timer Complete!".to_string());
    } else if !countdown.is_running() {
        lines.push("Paused".to_string());
    }
    lines.push(String::new());
    lines.push("space pause/resume  x reset".to_string());
    lines
}

pub fn weather_lines(weather: &WeatherPanel) -> Vec<String> {
    match weather.view() {
        WeatherView::Offline => vec![
            "Offline".to_string(),
            "Connect to the internet to view weather".to_string(),
        ],
        WeatherView::Loading => vec!["Loading Weather...".to_string()],
        WeatherView::Report { report, demo, error } => {
            let mut lines = vec![
                "Weather Today".to_string(),
                report.location.clone(),
                String::new(),
                format!("{}  {}°", report.icon().glyph(), report.temperature),
                report.description_display(),
                String::new(),
                format!(
                    "Humidity {}%   Wind {} km/h",
                    report.humidity, report.wind_speed
                ),
            ];
            if demo {
                lines.push(String::new());
                lines.push(match error {
                    Some(e) => format!("Demo data ({e})"),
                    None => "Demo data".to_string(),
                });
            }
            lines.push(String::new());
            lines.push("f refresh".to_string());
            lines
        }
    }
}

/// Paint one frame: backdrop, the mode indicator at the top right, and the
/// panel lines centred. A transition in progress is drawn dimmed.
pub fn draw<W: Write>(
    out: &mut W,
    size: (u16, u16),
    shell: &OrientationShell,
    panel: &Panel,
) -> io::Result<()> {
    let (cols, rows) = size;
    let mode = panel.mode();

    queue!(
        out,
        SetBackgroundColor(backdrop_color(mode.backdrop())),
        SetForegroundColor(Color::White),
        SetAttribute(Attribute::Reset),
        Clear(ClearType::All),
    )?;
    if shell.is_transitioning() {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }

    let label = indicator(mode);
    let label_x = cols.saturating_sub(label.chars().count() as u16 + 2);
    queue!(out, cursor::MoveTo(label_x, 0), Print(&label))?;

    let lines = panel_lines(panel);
    let top = rows.saturating_sub(lines.len() as u16) / 2;
    for (i, line) in lines.iter().enumerate() {
        let width = line.chars().count() as u16;
        let x = cols.saturating_sub(width) / 2;
        queue!(out, cursor::MoveTo(x, top + i as u16), Print(line))?;
    }

    queue!(out, SetAttribute(Attribute::Reset))?;
    out.flush()
}
