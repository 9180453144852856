//! TLS configuration and certificate validity probe

use crate::config::ScanConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{Finding, Severity};
use crate::target::Target;
use async_trait::async_trait;
use chrono::Utc;
use native_tls::{Protocol, TlsConnector};
use std::time::Duration;
use tokio::net::TcpStream;
use x509_parser::prelude::*;

const NEAR_EXPIRY_DAYS: i64 = 30;

/// Inspects the TLS handshake, certificate validity window and legacy
/// protocol acceptance
pub struct TlsProbe;

#[async_trait]
impl super::Probe for TlsProbe {
    fn name(&self) -> &str {
        "tls"
    }

    fn description(&self) -> &str {
        "Checks TLS certificate validity, expiry window and legacy protocol support"
    }

    fn deadline(&self, config: &ScanConfig) -> Duration {
        Duration::from_millis(config.timeouts.tls_ms)
    }

    async fn probe(
        &self,
        _client: &HttpClient,
        target: &Target,
        _config: &ScanConfig,
    ) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        if !target.is_https() {
            findings.push(
                Finding::new(Severity::Medium, "Site not using HTTPS")
                    .with_details("HTTP URL provided")
                    .with_remediation("Redirect HTTP to HTTPS and use HSTS."),
            );
            return Ok(findings);
        }

        let host = target.host();
        let port = target.port();

        // Permissive handshake first: certificate problems are reported
        // from the parsed certificate, not from validation errors.
        let connector = TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .request_alpns(&["h2", "http/1.1"])
            .build()?;
        let connector = tokio_native_tls::TlsConnector::from(connector);

        let stream = match TcpStream::connect((host, port)).await {
            Ok(stream) => stream,
            Err(e) => {
                findings.push(tls_connection_failed(e.to_string()));
                return Ok(findings);
            }
        };
        let tls_stream = match connector.connect(host, stream).await {
            Ok(stream) => stream,
            Err(e) => {
                findings.push(tls_connection_failed(e.to_string()));
                return Ok(findings);
            }
        };

        match tls_stream.get_ref().peer_certificate() {
            Ok(Some(cert)) => match cert.to_der() {
                Ok(der) => check_certificate(&der, &mut findings),
                Err(e) => findings.push(
                    Finding::new(Severity::High, "Certificate validity unknown")
                        .with_details(e.to_string())
                        .with_remediation("Ensure certificate has valid dates."),
                ),
            },
            _ => findings.push(
                Finding::new(Severity::High, "No certificate returned")
                    .with_remediation("Install a valid certificate."),
            ),
        }
        let negotiated = tls_stream.get_ref().negotiated_alpn().ok().flatten();
        if let Some(finding) = alpn_finding(negotiated.as_deref()) {
            findings.push(finding);
        }
        drop(tls_stream);

        // Second handshake capped at TLS 1.1: success means the server
        // still accepts legacy protocols.
        if accepts_legacy_protocols(host, port).await {
            findings.push(
                Finding::new(Severity::High, "Insecure TLS protocol negotiated")
                    .with_details("Server accepts TLS 1.1 or lower")
                    .with_remediation("Disable TLS 1.0/1.1; require TLS 1.2+."),
            );
        }

        Ok(findings)
    }
}

fn alpn_finding(negotiated: Option<&[u8]>) -> Option<Finding> {
    (negotiated == Some(b"h2".as_slice())).then(|| {
        Finding::new(Severity::Info, "HTTP/2 negotiated via ALPN")
            .with_details("h2")
            .with_remediation("Harden HTTP/2 settings and DoS protections.")
    })
}

fn tls_connection_failed(details: String) -> Finding {
    Finding::new(Severity::High, "TLS connection failed")
        .with_details(details)
        .with_remediation("Ensure port 443 is open and a valid cert is installed.")
}

fn check_certificate(der: &[u8], findings: &mut Vec<Finding>) {
    let cert = match X509Certificate::from_der(der) {
        Ok((_, cert)) => cert,
        Err(e) => {
            findings.push(
                Finding::new(Severity::High, "Certificate validity unknown")
                    .with_details(e.to_string())
                    .with_remediation("Ensure certificate has valid dates."),
            );
            return;
        }
    };

    let now = Utc::now().timestamp();
    let not_before = cert.validity().not_before;
    let not_after = cert.validity().not_after;

    if now < not_before.timestamp() {
        findings.push(
            Finding::new(Severity::High, "Certificate not yet valid")
                .with_details(
                    not_before
                        .to_rfc2822()
                        .unwrap_or_else(|_| "unknown".to_string()),
                )
                .with_remediation("Verify system time and certificate issuance."),
        );
    }
    if now > not_after.timestamp() {
        findings.push(
            Finding::new(Severity::High, "Certificate expired")
                .with_details(
                    not_after
                        .to_rfc2822()
                        .unwrap_or_else(|_| "unknown".to_string()),
                )
                .with_remediation("Renew the TLS certificate."),
        );
    } else {
        let days_remaining = (not_after.timestamp() - now) / 86_400;
        if days_remaining <= NEAR_EXPIRY_DAYS {
            findings.push(
                Finding::new(Severity::Medium, "Certificate near expiry")
                    .with_details(format!("{days_remaining} days remaining"))
                    .with_remediation("Plan certificate renewal."),
            );
        }
    }
}

async fn accepts_legacy_protocols(host: &str, port: u16) -> bool {
    let connector = TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .max_protocol_version(Some(Protocol::Tlsv11))
        .build();
    let Ok(connector) = connector else {
        // Platform TLS stacks without TLS 1.1 client support cannot run
        // this check; stay silent rather than guess.
        return false;
    };
    let connector = tokio_native_tls::TlsConnector::from(connector);

    let Ok(stream) = TcpStream::connect((host, port)).await else {
        return false;
    };
    connector.connect(host, stream).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h2_negotiation_yields_an_info_finding() {
        let finding = alpn_finding(Some(b"h2")).expect("finding");
        assert_eq!(finding.severity, Severity::Info);
        assert_eq!(finding.title, "HTTP/2 negotiated via ALPN");
        assert_eq!(finding.evidence, None);
        assert_eq!(finding.details.as_deref(), Some("h2"));
    }

    #[test]
    fn other_alpn_outcomes_are_silent() {
        assert!(alpn_finding(None).is_none());
        assert!(alpn_finding(Some(b"http/1.1")).is_none());
    }
}
