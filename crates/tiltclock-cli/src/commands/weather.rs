use clap::Args;
use tiltclock_core::{
    Config, ConnectivityProbe, Geolocator, WeatherPanel, WeatherService, WeatherView,
};

use crate::dashboard::{render, CONNECTIVITY_TIMEOUT};

#[derive(Args)]
pub struct WeatherArgs {
    /// Query this city instead of locating (skips geolocation)
    #[arg(long)]
    city: Option<String>,
    /// Skip geolocation and query the default city
    #[arg(long)]
    no_locate: bool,
    /// Override the provider endpoint
    #[arg(long)]
    endpoint: Option<String>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: WeatherArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(endpoint) = args.endpoint {
        config.weather.endpoint = endpoint;
    }

    let mut service = WeatherService::from_config(&config)?;
    if args.no_locate || args.city.is_some() {
        service = service.with_locator(Geolocator::Unavailable);
    }
    if let Some(city) = args.city {
        service = service.with_default_city(city);
    }

    let runtime = super::runtime()?;
    let connectivity = ConnectivityProbe::for_endpoint(service.endpoint(), CONNECTIVITY_TIMEOUT)?;
    let online = runtime.block_on(connectivity.check());

    let mut panel = WeatherPanel::new(online);
    if !online {
        if args.json {
            let out = serde_json::json!({
                "online": false,
                "report": null,
                "demo": false,
                "error": null,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            for line in render::weather_lines(&panel) {
                println!("{line}");
            }
        }
        return Ok(());
    }

    panel.begin_fetch();
    let result = runtime.block_on(service.fetch());
    panel.complete_fetch(result);

    let WeatherView::Report { report, demo, error } = panel.view() else {
        return Err("weather fetch did not complete".into());
    };

    if args.json {
        let out = serde_json::json!({
            "online": true,
            "report": report,
            "icon": report.icon(),
            "demo": demo,
            "error": error,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in render::weather_lines(&panel) {
            println!("{line}");
        }
    }
    if let Some(error) = error {
        eprintln!("error: {error}");
    }
    Ok(())
}
