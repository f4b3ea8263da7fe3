use clap::Subcommand;
use tiltclock_core::format;
use tiltclock_core::panels::countdown::parse_entry;

#[derive(Subcommand)]
pub enum CountdownAction {
    /// Parse a digit-pad entry (up to 6 digits, HHMMSS left-padded)
    Parse {
        /// Digits as typed on the pad, e.g. "130045" or "5"
        digits: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: CountdownAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CountdownAction::Parse { digits, json } => {
            let secs = parse_entry(&digits)?;
            let entry = format::digit_entry(&digits);
            let display = format::countdown(secs);
            if json {
                let out = serde_json::json!({
                    "entry": entry,
                    "total_secs": secs,
                    "display": display,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{entry} = {secs} seconds ({display})");
            }
        }
    }
    Ok(())
}
