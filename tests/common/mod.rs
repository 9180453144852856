//! Common test utilities

use kestrel::config::ScanConfig;

/// Creates a ScanConfig with deadlines short enough for tests
pub fn test_config() -> ScanConfig {
    let mut config = ScanConfig::default();
    config.timeouts.default_ms = 2000;
    config.timeouts.tls_ms = 2000;
    config.timeouts.port_probe_ms = 200;
    config.concurrency.port_probes = 5;
    config.delegated.poll_interval_ms = 10;
    config.delegated.poll_attempts = 2;
    config.user_agent = "Kestrel-Test/0.1.0".to_string();
    config
}
