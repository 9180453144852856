//! Target descriptor for a scan

use crate::error::{KestrelError, Result};
use url::Url;

/// Parsed scan target. Construction enforces the one scan-level
/// precondition: the scheme must be http or https.
#[derive(Debug, Clone)]
pub struct Target {
    url: Url,
    host: String,
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw)?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(KestrelError::InvalidTarget(format!(
                    "unsupported scheme '{scheme}': only http and https targets are supported"
                )))
            }
        }
        let host = url
            .host_str()
            .ok_or_else(|| KestrelError::InvalidTarget("target URL has no host".to_string()))?
            .to_string();
        Ok(Self { url, host })
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, or the scheme default
    pub fn port(&self) -> u16 {
        self.url
            .port()
            .unwrap_or(if self.is_https() { 443 } else { 80 })
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }

    /// The port serving the target itself. Finding this one open is not an
    /// exposure: 443 for https targets, 80 for http targets.
    pub fn front_door_port(&self) -> u16 {
        if self.is_https() {
            443
        } else {
            80
        }
    }

    /// Scheme + host (+ explicit port), no path or query
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Target URL with a single query parameter appended, for the
    /// injection heuristics
    pub fn with_query_param(&self, key: &str, value: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().clear().append_pair(key, value);
        url
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}
