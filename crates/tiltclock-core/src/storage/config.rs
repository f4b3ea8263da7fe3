//! TOML-based application configuration.
//!
//! Stores:
//! - Weather provider endpoint, credential, and default city
//! - Geolocation source
//! - Alarm defaults
//! - Haptic and shell timing preferences
//!
//! Configuration is stored at `~/.config/tiltclock/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::orientation::ShellTiming;
use crate::panels::alarm::parse_alarm_time;

pub const DEFAULT_CITY: &str = "London";
pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const API_KEY_ENV: &str = "TILTCLOCK_OWM_API_KEY";

/// Credential baked in at build time, if any.
const BAKED_API_KEY: Option<&str> = option_env!("TILTCLOCK_OWM_API_KEY");

/// Weather provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Empty means "use the environment or the build-time key".
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    /// Look the position up from the public IP address.
    Ip,
    /// Use `latitude`/`longitude` from this file.
    Fixed,
    /// No geolocation; always query the default city.
    Off,
}

/// Geolocation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_location_source")]
    pub source: LocationSource,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,
    #[serde(default = "default_location_timeout_ms")]
    pub timeout_ms: u64,
}

/// Alarm configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    /// 24-hour `HH:MM`.
    #[serde(default = "default_alarm_time")]
    pub default_time: String,
    /// Ring for alarm minutes skipped over while the process was suspended.
    #[serde(default = "default_true")]
    pub catch_up_missed: bool,
}

/// Haptic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HapticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Orientation shell and background probe timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default = "default_connectivity_interval_secs")]
    pub connectivity_interval_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tiltclock/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub alarm: AlarmConfig,
    #[serde(default)]
    pub haptics: HapticsConfig,
    #[serde(default)]
    pub shell: ShellConfig,
}

// Default functions
fn default_city() -> String {
    DEFAULT_CITY.into()
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_location_source() -> LocationSource {
    LocationSource::Ip
}
fn default_lookup_url() -> String {
    "http://ip-api.com/json".into()
}
fn default_location_timeout_ms() -> u64 {
    5_000
}
fn default_alarm_time() -> String {
    "07:00".into()
}
fn default_true() -> bool {
    true
}
fn default_settle_delay_ms() -> u64 {
    100
}
fn default_transition_ms() -> u64 {
    150
}
fn default_connectivity_interval_secs() -> u64 {
    15
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            default_city: default_city(),
            endpoint: default_endpoint(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            source: default_location_source(),
            latitude: None,
            longitude: None,
            lookup_url: default_lookup_url(),
            timeout_ms: default_location_timeout_ms(),
        }
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            default_time: default_alarm_time(),
            catch_up_missed: true,
        }
    }
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            transition_ms: default_transition_ms(),
            connectivity_interval_secs: default_connectivity_interval_secs(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if !is_leaf {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                serde_json::Value::Number(_) => parse_number(value)
                    .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                // Unset optional fields take a number when the input looks like one.
                serde_json::Value::Null => parse_number(value)
                    .unwrap_or_else(|| serde_json::Value::String(value.into())),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_err(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if the key is
    /// unknown or the value does not fit the field.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        if key == "alarm.default_time" {
            parse_alarm_time(&updated.alarm.default_time).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        }
        *self = updated;
        Ok(())
    }

    /// Effective API credential: environment, then this file, then the
    /// build-time key. May be empty.
    pub fn weather_api_key(&self) -> String {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                return key;
            }
        }
        if !self.weather.api_key.is_empty() {
            return self.weather.api_key.clone();
        }
        BAKED_API_KEY.unwrap_or_default().to_string()
    }

    /// Configured default alarm time, or 07:00 if the stored value is bad.
    pub fn alarm_time(&self) -> NaiveTime {
        parse_alarm_time(&self.alarm.default_time).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to 07:00");
            NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default()
        })
    }

    pub fn shell_timing(&self) -> ShellTiming {
        ShellTiming {
            settle_delay: Duration::from_millis(self.shell.settle_delay_ms),
            transition: Duration::from_millis(self.shell.transition_ms),
        }
    }

    pub fn connectivity_interval(&self) -> Duration {
        Duration::from_secs(self.shell.connectivity_interval_secs.max(1))
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        return Some(serde_json::Value::Number(n.into()));
    }
    if let Ok(n) = value.parse::<i64>() {
        return Some(serde_json::Value::Number(n.into()));
    }
    value
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.weather.default_city, "London");
        assert_eq!(parsed.location.source, LocationSource::Ip);
        assert!(parsed.location.latitude.is_none());
        assert_eq!(parsed.shell.settle_delay_ms, 100);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[weather]\ndefault_city = \"Oslo\"\n").unwrap();
        assert_eq!(parsed.weather.default_city, "Oslo");
        assert_eq!(parsed.weather.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(parsed.alarm.default_time, "07:00");
        assert!(parsed.haptics.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("haptics.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("shell.transition_ms").as_deref(), Some("150"));
        assert_eq!(cfg.get("location.source").as_deref(), Some("ip"));
        assert!(cfg.get("weather.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_coerces_by_existing_type() {
        let mut cfg = Config::default();
        cfg.set("haptics.enabled", "false").unwrap();
        cfg.set("shell.connectivity_interval_secs", "30").unwrap();
        cfg.set("weather.default_city", "Lisbon").unwrap();
        assert!(!cfg.haptics.enabled);
        assert_eq!(cfg.shell.connectivity_interval_secs, 30);
        assert_eq!(cfg.weather.default_city, "Lisbon");
    }

    #[test]
    fn set_fills_unset_optionals() {
        let mut cfg = Config::default();
        cfg.set("location.source", "fixed").unwrap();
        cfg.set("location.latitude", "59.91").unwrap();
        cfg.set("location.longitude", "10.75").unwrap();
        assert_eq!(cfg.location.source, LocationSource::Fixed);
        assert_eq!(cfg.location.latitude, Some(59.91));
        assert_eq!(cfg.location.longitude, Some(10.75));
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.set("haptics.nope", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            cfg.set("haptics.enabled", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("location.source", "gps"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("alarm.default_time", "7am"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.alarm.default_time, "07:00");
    }

    #[test]
    fn units_are_not_configurable() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("weather.units", "imperial"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.get("weather.units").is_none());

        // Files written before the key was removed still load.
        let parsed: Config = toml::from_str("[weather]\nunits = \"imperial\"\n").unwrap();
        assert_eq!(parsed.weather.default_city, "London");
    }

    #[test]
    fn load_from_missing_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.weather.default_city, "London");
        assert!(path.exists());
    }

    #[test]
    fn load_from_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "weather = [").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn timing_helpers() {
        let mut cfg = Config::default();
        assert_eq!(cfg.shell_timing(), ShellTiming::default());
        cfg.shell.connectivity_interval_secs = 0;
        assert_eq!(cfg.connectivity_interval(), Duration::from_secs(1));
        cfg.alarm.default_time = "bogus".into();
        assert_eq!(cfg.alarm_time(), NaiveTime::from_hms_opt(7, 0, 0).unwrap());
    }
}
