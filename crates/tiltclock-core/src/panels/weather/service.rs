//! Weather fetch pipeline.
//!
//! ```text
//! locate ──ok──> coordinate query ─┐
//!    └──err──> default-city query ─┴─> GET ──> status check ──> decode
//! ```
//!
//! Geolocation errors end at the first stage; only request, status, and
//! decode failures come back as `WeatherError`.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use super::geolocation::{Coordinates, Geolocator};
use super::report::{parse_response, WeatherReport};
use crate::error::WeatherError;
use crate::storage::Config;

/// The decoder reads Celsius and m/s, so the query is always metric.
const UNITS: &str = "metric";

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Coordinates(Coordinates),
    City(String),
}

#[derive(Debug, Clone)]
pub struct WeatherService {
    client: Client,
    endpoint: String,
    api_key: String,
    default_city: String,
    locator: Geolocator,
}

impl WeatherService {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        default_city: impl Into<String>,
        locator: Geolocator,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            default_city: default_city.into(),
            locator,
        }
    }

    /// Build the service, its HTTP client, and its geolocator from config.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.weather.request_timeout_ms))
            .build()?;
        let locator = Geolocator::from_config(&config.location, client.clone());
        Ok(Self::new(
            client,
            &config.weather.endpoint,
            config.weather_api_key(),
            &config.weather.default_city,
            locator,
        ))
    }

    pub fn with_default_city(mut self, city: impl Into<String>) -> Self {
        self.default_city = city.into();
        self
    }

    pub fn with_locator(mut self, locator: Geolocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Stage one. Never fails: any geolocation problem yields the city query.
    pub async fn resolve_query(&self) -> WeatherQuery {
        if !self.locator.is_available() {
            tracing::debug!("geolocation unavailable, using default city");
            return WeatherQuery::City(self.default_city.clone());
        }
        match self.locator.locate().await {
            Ok(coords) => WeatherQuery::Coordinates(coords),
            Err(e) => {
                tracing::debug!(error = %e, "geolocation failed, using default city");
                WeatherQuery::City(self.default_city.clone())
            }
        }
    }

    pub fn request_url(&self, query: &WeatherQuery) -> Result<Url, WeatherError> {
        let mut url = Url::parse(&self.endpoint)?;
        {
            let mut pairs = url.query_pairs_mut();
            match query {
                WeatherQuery::Coordinates(c) => {
                    pairs
                        .append_pair("lat", &c.latitude.to_string())
                        .append_pair("lon", &c.longitude.to_string());
                }
                WeatherQuery::City(city) => {
                    pairs.append_pair("q", city);
                }
            }
            pairs
                .append_pair("appid", &self.api_key)
                .append_pair("units", UNITS);
        }
        Ok(url)
    }

    /// Stages two and three for an already resolved query.
    pub async fn fetch_query(&self, query: &WeatherQuery) -> Result<WeatherReport, WeatherError> {
        let url = self.request_url(query)?;
        tracing::debug!(query = ?query, "requesting current weather");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        parse_response(&body)
    }

    /// The whole pipeline.
    pub async fn fetch(&self) -> Result<WeatherReport, WeatherError> {
        let query = self.resolve_query().await;
        self.fetch_query(&query).await
    }
}
