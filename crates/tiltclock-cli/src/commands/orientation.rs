use clap::Args;
use tiltclock_core::detect;

#[derive(Args)]
pub struct OrientationArgs {
    /// Window width
    #[arg(long)]
    width: u32,
    /// Window height
    #[arg(long)]
    height: u32,
    /// Legacy rotation angle in degrees (0, 90, 180, -90)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    angle: i32,
    /// Orientation type reported by a primary orientation API
    #[arg(long)]
    primary: Option<String>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: OrientationArgs) -> Result<(), Box<dyn std::error::Error>> {
    let orientation = detect(args.primary.as_deref(), args.width, args.height, args.angle);
    let mode = orientation.mode();
    if args.json {
        let out = serde_json::json!({
            "orientation": orientation,
            "mode": mode,
            "backdrop": mode.backdrop(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{orientation} -> {}", mode.label());
    }
    Ok(())
}
