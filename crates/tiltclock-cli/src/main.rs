use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod dashboard;

#[derive(Parser)]
#[command(name = "tiltclock", version, about = "Orientation-switched clock, stopwatch, timer and weather")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dashboard; the panel follows the terminal's orientation
    Run(commands::run::RunArgs),
    /// Fetch current weather once
    Weather(commands::weather::WeatherArgs),
    /// Resolve an orientation from window dimensions
    Orientation(commands::orientation::OrientationArgs),
    /// Countdown helpers
    Countdown {
        #[command(subcommand)]
        action: commands::countdown::CountdownAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// One-shot commands log to stderr. The dashboard owns the screen, so it
/// logs to a file in the data directory instead.
fn init_logging(to_file: bool) {
    let default_level = if to_file { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if to_file {
        let log_file = tiltclock_core::storage::data_dir().ok().and_then(|dir| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("tiltclock.log"))
                .ok()
        });
        if let Some(file) = log_file {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(matches!(cli.command, Commands::Run(_)));

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Weather(args) => commands::weather::run(args),
        Commands::Orientation(args) => commands::orientation::run(args),
        Commands::Countdown { action } => commands::countdown::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
