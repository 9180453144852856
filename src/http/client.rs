//! HTTP client wrapper with request tracking

use crate::config::ScanConfig;
use crate::error::Result;
use reqwest::{Client, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Thin reqwest wrapper shared by all probes of one scan.
///
/// Redirects are never followed (the header probe inspects raw 3xx
/// responses) and requests are never retried: a failed request is a
/// terminal outcome for the probe that issued it.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    request_count: Arc<AtomicU64>,
}

impl HttpClient {
    /// Creates a new HttpClient from scan configuration
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeouts.default_ms))
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(false)
            .build()?;

        Ok(Self {
            client,
            request_count: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Sends a GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let response = self.client.get(url).send().await?;
        debug!("Response: {} for {}", response.status(), response.url());
        Ok(response)
    }

    /// Returns the total number of requests made
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}
