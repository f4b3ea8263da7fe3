//! Normalized weather reading and the provider's JSON shape.

use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    /// Degrees Celsius, rounded.
    pub temperature: i32,
    /// Provider's primary category, e.g. `Clouds`.
    pub condition: String,
    pub description: String,
    /// Percent.
    pub humidity: u32,
    /// Kilometers per hour, rounded.
    pub wind_speed: i32,
}

impl WeatherReport {
    /// Fixed reading shown whenever a live fetch fails.
    pub fn demo() -> Self {
        Self {
            location: "Demo Location".into(),
            temperature: 22,
            condition: "Clear".into(),
            description: "clear sky".into(),
            humidity: 65,
            wind_speed: 15,
        }
    }

    pub fn icon(&self) -> WeatherIcon {
        WeatherIcon::from_condition(&self.condition)
    }

    /// Description with its first letter upper-cased.
    pub fn description_display(&self) -> String {
        let mut chars = self.description.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherIcon {
    Clear,
    Clouds,
    Rain,
    Snow,
    Other,
}

impl WeatherIcon {
    /// Case-insensitive exact match on the condition keyword.
    pub fn from_condition(condition: &str) -> Self {
        match condition.to_ascii_lowercase().as_str() {
            "clear" => WeatherIcon::Clear,
            "clouds" => WeatherIcon::Clouds,
            "rain" | "drizzle" => WeatherIcon::Rain,
            "snow" => WeatherIcon::Snow,
            _ => WeatherIcon::Other,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherIcon::Clear => "☀",
            WeatherIcon::Rain => "☂",
            WeatherIcon::Snow => "❄",
            WeatherIcon::Clouds | WeatherIcon::Other => "☁",
        }
    }
}

/// Round half up, the way browsers round display numbers.
fn round_half_up(x: f64) -> i32 {
    (x + 0.5).floor() as i32
}

/// m/s to km/h, rounded.
pub fn kmh_from_ms(ms: f64) -> i32 {
    round_half_up(ms * 3.6)
}

// ── Provider response ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    name: String,
    #[serde(default)]
    sys: Option<ProviderSys>,
    main: ProviderMain,
    weather: Vec<ProviderCondition>,
    wind: ProviderWind,
}

#[derive(Debug, Deserialize)]
struct ProviderSys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ProviderCondition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ProviderWind {
    speed: f64,
}

impl TryFrom<ProviderResponse> for WeatherReport {
    type Error = WeatherError;

    fn try_from(resp: ProviderResponse) -> Result<Self, Self::Error> {
        let condition = resp
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Decode("empty weather array".into()))?;

        let location = match resp.sys.and_then(|s| s.country).filter(|c| !c.is_empty()) {
            Some(country) => format!("{}, {}", resp.name, country),
            None => resp.name,
        };

        Ok(WeatherReport {
            location,
            temperature: round_half_up(resp.main.temp),
            condition: condition.main,
            description: condition.description,
            humidity: resp.main.humidity.round().max(0.0) as u32,
            wind_speed: kmh_from_ms(resp.wind.speed),
        })
    }
}

/// Decode and normalize a provider body.
pub fn parse_response(body: &str) -> Result<WeatherReport, WeatherError> {
    let resp: ProviderResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Decode(e.to_string()))?;
    WeatherReport::try_from(resp)
}
