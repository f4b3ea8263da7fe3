//! Best-effort position lookup for the coordinate-based query.
//!
//! Each lookup is a single attempt under a bounded wait. Failures are
//! returned to the caller, which falls back to the default city.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::GeolocationError;
use crate::storage::config::{LocationConfig, LocationSource};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Shape shared by the common IP geolocation endpoints.
#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(alias = "latitude")]
    lat: Option<f64>,
    #[serde(alias = "longitude")]
    lon: Option<f64>,
}

#[derive(Debug, Clone)]
pub enum Geolocator {
    /// The capability does not exist on this platform.
    Unavailable,
    Fixed(Coordinates),
    IpLookup {
        url: String,
        timeout: Duration,
        client: Client,
    },
}

impl Geolocator {
    pub fn from_config(config: &LocationConfig, client: Client) -> Self {
        match config.source {
            LocationSource::Off => Geolocator::Unavailable,
            LocationSource::Fixed => match (config.latitude, config.longitude) {
                (Some(latitude), Some(longitude)) => Geolocator::Fixed(Coordinates {
                    latitude,
                    longitude,
                }),
                _ => {
                    tracing::warn!("location.source is fixed but coordinates are missing");
                    Geolocator::Unavailable
                }
            },
            LocationSource::Ip => Geolocator::IpLookup {
                url: config.lookup_url.clone(),
                timeout: Duration::from_millis(config.timeout_ms),
                client,
            },
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Geolocator::Unavailable)
    }

    pub async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        match self {
            Geolocator::Unavailable => Err(GeolocationError::Unavailable),
            Geolocator::Fixed(coords) => Ok(*coords),
            Geolocator::IpLookup {
                url,
                timeout,
                client,
            } => {
                let timeout_ms = timeout.as_millis() as u64;
                tokio::time::timeout(*timeout, lookup(client, url))
                    .await
                    .map_err(|_| GeolocationError::Timeout { timeout_ms })?
            }
        }
    }
}

async fn lookup(client: &Client, url: &str) -> Result<Coordinates, GeolocationError> {
    let lookup_err = |e: reqwest::Error| GeolocationError::Lookup(e.to_string());

    let resp = client.get(url).send().await.map_err(lookup_err)?;
    if !resp.status().is_success() {
        return Err(GeolocationError::Lookup(format!("HTTP {}", resp.status())));
    }
    let body = resp.text().await.map_err(lookup_err)?;
    let data: IpLookupResponse =
        serde_json::from_str(&body).map_err(|e| GeolocationError::Lookup(e.to_string()))?;

    if let Some(status) = data.status.as_deref() {
        if status != "success" {
            return Err(GeolocationError::Lookup(format!("lookup status {status}")));
        }
    }
    match (data.lat, data.lon) {
        (Some(latitude), Some(longitude)) => Ok(Coordinates {
            latitude,
            longitude,
        }),
        _ => Err(GeolocationError::Lookup("response has no coordinates".into())),
    }
}
