use clap::Args;
use tiltclock_core::{Config, Orientation};

use crate::dashboard::{self, probe::TerminalProbe};

#[derive(Args)]
pub struct RunArgs {
    /// Pin the orientation type (e.g. "landscape-secondary") as a primary
    /// orientation API would report it
    #[arg(long)]
    orientation: Option<String>,
    /// Starting rotation angle (0, 90, 180, -90); press r to rotate
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    angle: i32,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(kind) = args.orientation.as_deref() {
        if Orientation::parse(kind).is_none() {
            tracing::warn!(kind, "unknown orientation type, using portrait-primary");
        }
    }

    let config = Config::load_or_default();
    let probe = TerminalProbe::new(args.orientation, args.angle);
    tracing::info!(angle = args.angle, "dashboard starting");
    super::runtime()?.block_on(dashboard::run(config, probe))
}
