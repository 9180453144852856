//! Configuration management for the Kestrel scanner

use crate::models::Severity;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Per-probe deadlines, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeouts {
    /// Deadline for the header, heuristic and delegated probes
    pub default_ms: u64,
    /// Deadline for the TLS probe (handshakes are slower)
    pub tls_ms: u64,
    /// Per-connect timeout inside the port worker pool
    pub port_probe_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            default_ms: 8000,
            tls_ms: 10_000,
            port_probe_ms: 1500,
        }
    }
}

/// Concurrency degrees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concurrency {
    /// Number of workers draining the port catalog (floor 1)
    pub port_probes: usize,
}

impl Default for Concurrency {
    fn default() -> Self {
        Self { port_probes: 10 }
    }
}

/// Coordinates and polling cadence for the delegated active scanner
/// (a ZAP-compatible daemon). Host, port and API key fall back to the
/// `ZAP_HOST` / `ZAP_PORT` / `ZAP_API_KEY` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegatedConfig {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub poll_interval_ms: u64,
    pub poll_attempts: u32,
}

impl Default for DelegatedConfig {
    fn default() -> Self {
        let host = std::env::var("ZAP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("ZAP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8090);
        let api_key = std::env::var("ZAP_API_KEY").unwrap_or_default();
        Self {
            host,
            port,
            api_key,
            poll_interval_ms: 2000,
            poll_attempts: 30,
        }
    }
}

/// Configuration for a scan session. Immutable once the scan starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Severity floor for human-readable output
    pub min_severity: Severity,
    pub timeouts: Timeouts,
    pub concurrency: Concurrency,
    pub delegated: DelegatedConfig,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_severity: Severity::Info,
            timeouts: Timeouts::default(),
            concurrency: Concurrency::default(),
            delegated: DelegatedConfig::default(),
            user_agent: "Kestrel-Scanner/0.1.0".to_string(),
        }
    }
}

/// File-based configuration: every field is optional and overrides the
/// matching default when present. No recursive merging.
#[derive(Debug, Deserialize)]
struct FileConfig {
    min_severity: Option<String>,
    user_agent: Option<String>,
    timeouts: Option<TimeoutsSection>,
    concurrency: Option<ConcurrencySection>,
    delegated: Option<DelegatedSection>,
}

#[derive(Debug, Deserialize)]
struct TimeoutsSection {
    default_ms: Option<u64>,
    tls_ms: Option<u64>,
    port_probe_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ConcurrencySection {
    port_probes: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct DelegatedSection {
    host: Option<String>,
    port: Option<u16>,
    api_key: Option<String>,
    poll_interval_ms: Option<u64>,
    poll_attempts: Option<u32>,
}

fn overlay(file: FileConfig, config: &mut ScanConfig) {
    if let Some(sev) = file.min_severity {
        config.min_severity = Severity::from_label(&sev);
    }
    if let Some(ua) = file.user_agent {
        config.user_agent = ua;
    }
    if let Some(timeouts) = file.timeouts {
        if let Some(ms) = timeouts.default_ms {
            config.timeouts.default_ms = ms;
        }
        if let Some(ms) = timeouts.tls_ms {
            config.timeouts.tls_ms = ms;
        }
        if let Some(ms) = timeouts.port_probe_ms {
            config.timeouts.port_probe_ms = ms;
        }
    }
    if let Some(concurrency) = file.concurrency {
        if let Some(n) = concurrency.port_probes {
            config.concurrency.port_probes = n;
        }
    }
    if let Some(delegated) = file.delegated {
        if let Some(host) = delegated.host {
            config.delegated.host = host;
        }
        if let Some(port) = delegated.port {
            config.delegated.port = port;
        }
        if let Some(key) = delegated.api_key {
            config.delegated.api_key = key;
        }
        if let Some(ms) = delegated.poll_interval_ms {
            config.delegated.poll_interval_ms = ms;
        }
        if let Some(n) = delegated.poll_attempts {
            config.delegated.poll_attempts = n;
        }
    }
}

fn from_toml_str(content: &str) -> Result<ScanConfig, toml::de::Error> {
    let file_config: FileConfig = toml::from_str(content)?;
    let mut config = ScanConfig::default();
    overlay(file_config, &mut config);
    Ok(config)
}

/// Loads configuration from a TOML file, overlaying present fields on the
/// defaults. A missing or unreadable file yields the defaults.
pub fn load_config(path: Option<&Path>) -> ScanConfig {
    let Some(path) = path else {
        return ScanConfig::default();
    };
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Could not read config file {}: {e}", path.display());
            return ScanConfig::default();
        }
    };
    match from_toml_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Could not parse config file {}: {e}", path.display());
            ScanConfig::default()
        }
    }
}
