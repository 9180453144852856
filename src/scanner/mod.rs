//! Probe trait and scan orchestration engine

pub mod delegated;
pub mod executor;
pub mod headers;
pub mod ports;
pub mod tls;
pub mod vulns;

use crate::config::ScanConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{Finding, ScanResult, Severity, Summary};
use crate::target::Target;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Trait that every probe implements
#[async_trait]
pub trait Probe: Send + Sync {
    /// Returns the probe name, used as the timeout/failure finding label
    fn name(&self) -> &str;

    /// Returns a description of what this probe checks
    fn description(&self) -> &str;

    /// Deadline for this probe, taken from the scan configuration
    fn deadline(&self, config: &ScanConfig) -> Duration {
        Duration::from_millis(config.timeouts.default_ms)
    }

    /// Executes the probe and returns findings. Expected failure modes
    /// (unreachable host, bad responses) are reported as findings, not
    /// errors; anything that does escape is converted by the executor.
    async fn probe(
        &self,
        client: &HttpClient,
        target: &Target,
        config: &ScanConfig,
    ) -> Result<Vec<Finding>>;
}

/// Runs all registered probes concurrently and merges their findings in
/// registration order, regardless of completion order.
pub struct ScanEngine {
    probes: Vec<Arc<dyn Probe>>,
}

impl ScanEngine {
    /// Creates a ScanEngine with no registered probes
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    /// Creates a ScanEngine with the default probes, in the fixed order
    /// that defines the output contract: headers, TLS, ports, heuristics.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.register(Arc::new(headers::HeadersProbe));
        engine.register(Arc::new(tls::TlsProbe));
        engine.register(Arc::new(ports::PortsProbe));
        engine.register(Arc::new(vulns::VulnsProbe));
        engine
    }

    /// Registers a probe. Findings merge in registration order.
    pub fn register(&mut self, probe: Arc<dyn Probe>) {
        self.probes.push(probe);
    }

    /// Runs the full scan against one target.
    ///
    /// The only fatal condition is an invalid target scheme, checked
    /// before any probe starts. Every probe failure after that point is
    /// contained by the timeout guard and contributes one Info finding.
    pub async fn run(&self, target_url: &str, config: &ScanConfig) -> Result<ScanResult> {
        let target = Target::parse(target_url)?;
        let client = HttpClient::from_config(config)?;
        let mut result = ScanResult::new(target_url);

        let mut handles = Vec::with_capacity(self.probes.len());
        for probe in &self.probes {
            let probe = Arc::clone(probe);
            let client = client.clone();
            let config = config.clone();
            let target = target.clone();
            let deadline = probe.deadline(&config);
            let name = probe.name().to_string();

            info!("Spawning probe: {name}");
            let handle = tokio::spawn(async move {
                executor::guard(probe.name(), deadline, probe.probe(&client, &target, &config))
                    .await
            });
            handles.push((name, handle));
        }

        // Await in registration order so the merged finding list is a
        // stable contract independent of completion timing.
        for (name, handle) in handles {
            let findings = match handle.await {
                Ok(findings) => {
                    info!("Probe '{name}' completed: {} findings", findings.len());
                    findings
                }
                Err(e) => {
                    error!("Probe task '{name}' panicked: {e}");
                    vec![Finding::new(Severity::Info, format!("{name} scan failed"))
                        .with_details(e.to_string())]
                }
            };
            for finding in findings {
                result.add_finding(finding);
            }
        }

        result.summary = Summary::recompute(&result.findings);
        info!(
            "Scan of {target_url} complete: {} findings over {} requests",
            result.summary.total,
            client.request_count()
        );
        Ok(result)
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
