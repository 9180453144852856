//! Error types for Kestrel

use thiserror::Error;

/// Main error type for Kestrel operations
#[derive(Debug, Error)]
pub enum KestrelError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("TLS error: {0}")]
    TlsError(#[from] native_tls::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Probe error: {0}")]
    ProbeError(String),
}

/// Result type alias for Kestrel operations
pub type Result<T> = std::result::Result<T, KestrelError>;
