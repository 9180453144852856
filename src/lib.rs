//! Kestrel - Single-Endpoint Web Security Scanner
//!
//! Probes one web endpoint for common security misconfigurations: missing
//! hardening headers, weak or expiring TLS, exposed ports, and basic
//! injection/XSS heuristics. All probes run concurrently under per-probe
//! deadlines and their findings are merged into one severity-classified
//! result.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod report;
pub mod scanner;
pub mod target;
