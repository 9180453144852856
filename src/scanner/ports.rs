//! Port exposure probe: bounded worker pool over a fixed catalog

use crate::config::ScanConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{Finding, PortProbeResult, Severity};
use crate::target::Target;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::debug;

/// Commonly exposed service ports probed against every target
pub const PORT_CATALOG: [u16; 20] = [
    21, 22, 23, 25, 53, 80, 110, 143, 443, 465, 587, 993, 995, 3306, 3389, 5432, 6379, 8000, 8080,
    8443,
];

/// Checks the fixed port catalog for services exposed next to the target
pub struct PortsProbe;

#[async_trait]
impl super::Probe for PortsProbe {
    fn name(&self) -> &str {
        "ports"
    }

    fn description(&self) -> &str {
        "Probes a fixed catalog of common ports for unexpectedly exposed services"
    }

    async fn probe(
        &self,
        _client: &HttpClient,
        target: &Target,
        config: &ScanConfig,
    ) -> Result<Vec<Finding>> {
        let results = probe_ports(
            target.host(),
            &PORT_CATALOG,
            config.concurrency.port_probes,
            Duration::from_millis(config.timeouts.port_probe_ms),
        )
        .await;

        Ok(open_port_findings(
            target.host(),
            target.front_door_port(),
            &results,
        ))
    }
}

/// Scans `ports` on `host` with `concurrency` workers draining one shared
/// claim counter. Every port is classified exactly once: connect success
/// means open, timeout or any connection error means closed. Results come
/// back in catalog order.
pub async fn probe_ports(
    host: &str,
    ports: &[u16],
    concurrency: usize,
    connect_timeout: Duration,
) -> Vec<PortProbeResult> {
    let ports = Arc::new(ports.to_vec());
    // The claim counter is the only state shared across workers. fetch_add
    // hands each index to exactly one worker.
    let next = Arc::new(AtomicUsize::new(0));
    let workers = concurrency.max(1).min(ports.len().max(1));

    let mut set = JoinSet::new();
    for _ in 0..workers {
        let ports = Arc::clone(&ports);
        let next = Arc::clone(&next);
        let host = host.to_string();
        set.spawn(async move {
            let mut classified = Vec::new();
            loop {
                let idx = next.fetch_add(1, Ordering::SeqCst);
                if idx >= ports.len() {
                    break;
                }
                let port = ports[idx];
                let open = matches!(
                    timeout(connect_timeout, TcpStream::connect((host.as_str(), port))).await,
                    Ok(Ok(_))
                );
                debug!("Port {port} on {host}: {}", if open { "open" } else { "closed" });
                classified.push(PortProbeResult { port, open });
            }
            classified
        });
    }

    let mut results = Vec::with_capacity(ports.len());
    while let Some(joined) = set.join_next().await {
        if let Ok(mut part) = joined {
            results.append(&mut part);
        }
    }

    // Workers finish in arbitrary order; restore catalog order so the
    // emitted findings are deterministic.
    results.sort_by_key(|r| ports.iter().position(|p| *p == r.port));
    results
}

/// Turns port classifications into findings. The target's own front door
/// (443 for https, 80 for http) is expected; every other open port is
/// surfaced as exposure.
pub fn open_port_findings(
    host: &str,
    front_door_port: u16,
    results: &[PortProbeResult],
) -> Vec<Finding> {
    results
        .iter()
        .filter(|r| r.open && r.port != front_door_port)
        .map(|r| {
            Finding::new(Severity::Info, "Open port detected")
                .with_details(format!("Port {} open on {host}", r.port))
                .with_remediation(
                    "Ensure only necessary services are exposed; restrict via firewall.",
                )
        })
        .collect()
}
