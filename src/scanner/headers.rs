//! Security headers probe

use crate::config::ScanConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{Finding, Severity};
use crate::target::Target;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tracing::debug;

/// Checks hardening headers, cookie flags and transport-related response
/// behavior on a single GET of the target
pub struct HeadersProbe;

struct HeaderCheck {
    name: &'static str,
    severity: Severity,
    details: &'static str,
    remediation: &'static str,
}

const HEADER_CHECKS: &[HeaderCheck] = &[
    HeaderCheck {
        name: "Content-Security-Policy",
        severity: Severity::High,
        details: "CSP header not set",
        remediation: "Define a strict CSP to mitigate XSS and data injection.",
    },
    HeaderCheck {
        name: "X-Frame-Options",
        severity: Severity::Medium,
        details: "Clickjacking protection header not set",
        remediation: "Add X-Frame-Options: DENY or SAMEORIGIN.",
    },
    HeaderCheck {
        name: "X-Content-Type-Options",
        severity: Severity::Medium,
        details: "MIME-sniffing protection absent",
        remediation: "Add X-Content-Type-Options: nosniff.",
    },
    HeaderCheck {
        name: "Referrer-Policy",
        severity: Severity::Low,
        details: "Referrer policy not set",
        remediation: "Add a strict Referrer-Policy, e.g. no-referrer or strict-origin-when-cross-origin.",
    },
    HeaderCheck {
        name: "Permissions-Policy",
        severity: Severity::Low,
        details: "No control over powerful browser features",
        remediation: "Define Permissions-Policy to limit features like camera, microphone, geolocation.",
    },
];

fn cookie_has_attribute(cookie: &str, attribute: &str) -> bool {
    cookie.split(';').any(|part| {
        let part = part.trim().to_ascii_lowercase();
        part == attribute || part.starts_with(&format!("{attribute}="))
    })
}

// A bare `SameSite` token does not count; browsers need an explicit value.
fn cookie_has_samesite_value(cookie: &str) -> bool {
    cookie.split(';').any(|part| {
        matches!(
            part.trim().to_ascii_lowercase().as_str(),
            "samesite=lax" | "samesite=strict" | "samesite=none"
        )
    })
}

fn check_cookies(headers: &HeaderMap, https: bool, findings: &mut Vec<Finding>) {
    for value in headers.get_all("set-cookie") {
        let Ok(cookie) = value.to_str() else {
            continue;
        };
        if https && !cookie_has_attribute(cookie, "secure") {
            findings.push(
                Finding::new(Severity::High, "Cookie without Secure flag")
                    .with_details(cookie)
                    .with_remediation("Set Secure on cookies over HTTPS."),
            );
        }
        if !cookie_has_attribute(cookie, "httponly") {
            findings.push(
                Finding::new(Severity::Medium, "Cookie without HttpOnly flag")
                    .with_details(cookie)
                    .with_remediation("Set HttpOnly to mitigate XSS cookie theft."),
            );
        }
        if !cookie_has_samesite_value(cookie) {
            findings.push(
                Finding::new(Severity::Low, "Cookie without SameSite attribute")
                    .with_details(cookie)
                    .with_remediation("Set SameSite=Lax/Strict/None as appropriate."),
            );
        }
    }
}

#[async_trait]
impl super::Probe for HeadersProbe {
    fn name(&self) -> &str {
        "headers"
    }

    fn description(&self) -> &str {
        "Checks HTTP security headers, cookie flags and HTTPS redirection"
    }

    async fn probe(
        &self,
        client: &HttpClient,
        target: &Target,
        _config: &ScanConfig,
    ) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        let response = match client.get(target.as_str()).await {
            Ok(response) => response,
            Err(e) => {
                findings.push(
                    Finding::new(Severity::High, "Failed to fetch headers")
                        .with_details(e.to_string())
                        .with_remediation(
                            "Ensure the host is reachable and not blocking requests.",
                        ),
                );
                return Ok(findings);
            }
        };

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        for check in HEADER_CHECKS {
            if header(check.name).is_none() {
                debug!("Header '{}' missing", check.name);
                findings.push(
                    Finding::new(check.severity, format!("Missing {}", check.name))
                        .with_details(check.details)
                        .with_remediation(check.remediation),
                );
            }
        }

        if let Some(server) = header("server") {
            findings.push(
                Finding::new(Severity::Info, "Server header reveals software")
                    .with_details(format!("Server: {server}"))
                    .with_remediation(
                        "Remove or obfuscate the Server header to reduce fingerprinting.",
                    ),
            );
        }

        check_cookies(&headers, target.is_https(), &mut findings);

        if ![200, 301, 302, 304].contains(&status) {
            findings.push(
                Finding::new(Severity::Info, "Unusual HTTP status code")
                    .with_details(format!("Status: {status}"))
                    .with_remediation("Review the endpoint behavior or redirections."),
            );
        }

        // HSTS only means anything over HTTPS
        if target.is_https() && header("strict-transport-security").is_none() {
            findings.push(
                Finding::new(Severity::Medium, "Missing HSTS header")
                    .with_details("Strict-Transport-Security not set")
                    .with_remediation(
                        "Add HSTS with includeSubDomains and preload if appropriate.",
                    ),
            );
        }

        // Plain-HTTP targets should 301/302 to an https location
        if !target.is_https() {
            let redirects_to_https = matches!(status, 301 | 302)
                && header("location")
                    .map(|l| l.to_ascii_lowercase().starts_with("https://"))
                    .unwrap_or(false);
            if !redirects_to_https {
                findings.push(
                    Finding::new(Severity::Medium, "HTTP not redirected to HTTPS")
                        .with_details("No 301/302 to https detected")
                        .with_remediation("Force HTTP to HTTPS with 301 and HSTS."),
                );
            }
        }

        if let Some(alt_svc) = header("alt-svc") {
            if alt_svc.to_ascii_lowercase().contains("h3") {
                findings.push(
                    Finding::new(Severity::Info, "HTTP/3 advertised")
                        .with_details(alt_svc)
                        .with_remediation("Ensure QUIC/HTTP3 configuration is hardened."),
                );
            }
        }

        Ok(findings)
    }
}
