pub mod config;

pub use config::Config;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the tiltclock data directory, creating it if needed.
///
/// `TILTCLOCK_CONFIG_DIR` wins outright. Otherwise `~/.config/tiltclock`,
/// or `~/.config/tiltclock-dev` when `TILTCLOCK_ENV=dev`.
///
/// # Errors
/// Returns an error if no home directory can be determined or if creating
/// the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TILTCLOCK_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?.join(".config");
            let env = std::env::var("TILTCLOCK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base.join("tiltclock-dev")
            } else {
                base.join("tiltclock")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
