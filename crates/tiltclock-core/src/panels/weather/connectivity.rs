//! Online/offline detection by TCP reachability of the weather host.

use std::time::Duration;

use tokio::net::TcpStream;
use url::{Host, Url};

use crate::error::WeatherError;

#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl ConnectivityProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host and port that serve `endpoint`.
    pub fn for_endpoint(endpoint: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let url = Url::parse(endpoint)?;
        // IPv6 literals are kept without brackets so they resolve as addresses.
        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => return Err(WeatherError::Endpoint(url::ParseError::EmptyHost)),
        };
        let port = url.port_or_known_default().unwrap_or(443);
        Ok(Self::new(host, port, timeout))
    }

    pub fn target(&self) -> (&str, u16) {
        (&self.host, self.port)
    }

    /// True when a TCP connection opens within the timeout.
    pub async fn check(&self) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        match tokio::time::timeout(self.timeout, connect).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!(host = %self.host, error = %e, "connectivity probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(host = %self.host, "connectivity probe timed out");
                false
            }
        }
    }
}
