//! Timeout-guarded probe execution

use crate::error::Result;
use crate::models::{Finding, Severity};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Races a probe's completion against its deadline.
///
/// The probe winning passes its findings through unchanged. A probe error
/// or an elapsed deadline each collapse to exactly one Info finding, so a
/// misbehaving probe can never abort the scan. Dropping the losing future
/// closes any socket or TLS session it still held.
pub async fn guard<F>(label: &str, deadline: Duration, operation: F) -> Vec<Finding>
where
    F: Future<Output = Result<Vec<Finding>>>,
{
    match timeout(deadline, operation).await {
        Ok(Ok(findings)) => findings,
        Ok(Err(e)) => {
            warn!("Probe '{label}' failed: {e}");
            vec![Finding::new(Severity::Info, format!("{label} scan failed"))
                .with_details(e.to_string())]
        }
        Err(_) => {
            warn!("Probe '{label}' timed out after {}ms", deadline.as_millis());
            vec![
                Finding::new(Severity::Info, format!("{label} scan timeout")).with_details(
                    format!("no result within {}ms", deadline.as_millis()),
                ),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KestrelError;

    #[tokio::test]
    async fn passes_findings_through_on_completion() {
        let findings = guard("headers", Duration::from_secs(1), async {
            Ok(vec![Finding::new(Severity::High, "Missing CSP")])
        })
        .await;

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].title, "Missing CSP");
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[tokio::test]
    async fn converts_error_to_single_info_finding() {
        let findings = guard("tls", Duration::from_secs(1), async {
            Err(KestrelError::ProbeError("handshake refused".to_string()))
        })
        .await;

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(findings[0].title, "tls scan failed");
        assert!(findings[0]
            .details
            .as_deref()
            .unwrap()
            .contains("handshake refused"));
    }

    #[tokio::test]
    async fn converts_timeout_to_single_info_finding() {
        let findings = guard("ports", Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![Finding::new(Severity::Critical, "never emitted")])
        })
        .await;

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(findings[0].title, "ports scan timeout");
    }
}
