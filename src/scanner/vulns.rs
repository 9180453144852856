//! Basic injection and DOM heuristics probe

use crate::config::ScanConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{Finding, Severity};
use crate::target::Target;
use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

const XSS_PAYLOAD: &str = "<script>alert('xss')</script>";
const SQLI_PAYLOAD: &str = "' OR '1'='1";

fn sql_error_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)sql syntax|mysql|sqlite|postgres|odbc|oracle").expect("valid regex")
    })
}

/// Runs lightweight reflected-XSS and SQL-injection checks plus static
/// DOM inspection of the root page
pub struct VulnsProbe;

#[async_trait]
impl super::Probe for VulnsProbe {
    fn name(&self) -> &str {
        "vulns"
    }

    fn description(&self) -> &str {
        "Runs basic reflected XSS, SQL injection and DOM hygiene heuristics"
    }

    async fn probe(
        &self,
        client: &HttpClient,
        target: &Target,
        _config: &ScanConfig,
    ) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        findings.extend(check_reflected_xss(client, target).await);
        findings.extend(check_basic_sqli(client, target).await);
        findings.extend(check_dom(client, target).await);
        Ok(findings)
    }
}

async fn check_reflected_xss(client: &HttpClient, target: &Target) -> Vec<Finding> {
    let url = target.with_query_param("q", XSS_PAYLOAD);
    match client.get(url.as_str()).await {
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            if (200..400).contains(&status) && body.contains(XSS_PAYLOAD) {
                return vec![Finding::new(Severity::High, "Potential reflected XSS")
                    .with_details(format!("Payload reflected at {}", url.path()))
                    .with_evidence(XSS_PAYLOAD)
                    .with_remediation("HTML-encode user input and use a strict CSP.")];
            }
            Vec::new()
        }
        Err(e) => vec![Finding::new(Severity::Info, "XSS check failed")
            .with_details(e.to_string())
            .with_remediation("Ensure the target is reachable.")],
    }
}

async fn check_basic_sqli(client: &HttpClient, target: &Target) -> Vec<Finding> {
    let url = target.with_query_param("id", SQLI_PAYLOAD);
    match client.get(url.as_str()).await {
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            if status >= 500 {
                return vec![Finding::new(
                    Severity::Medium,
                    "Possible SQL injection error behavior",
                )
                .with_details(format!("{status} error for payload at {}", url.path()))
                .with_remediation("Use parameterized queries and input validation.")];
            }
            if sql_error_regex().is_match(&body) {
                return vec![Finding::new(Severity::Medium, "Potential SQL error leakage")
                    .with_details(format!("SQL keywords in response at {}", url.path()))
                    .with_remediation(
                        "Disable detailed error messages in production; sanitize inputs.",
                    )];
            }
            Vec::new()
        }
        Err(e) => vec![Finding::new(Severity::Info, "SQLi check failed")
            .with_details(e.to_string())
            .with_remediation("Ensure the target is reachable.")],
    }
}

async fn check_dom(client: &HttpClient, target: &Target) -> Vec<Finding> {
    match client.get(target.as_str()).await {
        Ok(response) => {
            let body = response.text().await.unwrap_or_default();
            dom_findings(&body, target.is_https())
        }
        Err(e) => vec![Finding::new(Severity::Info, "DOM checks failed")
            .with_details(e.to_string())
            .with_remediation("Ensure the target is reachable.")],
    }
}

/// Static inspection of the root page. Synchronous on purpose: the parsed
/// DOM is not Send and must not live across an await point.
fn dom_findings(body: &str, https: bool) -> Vec<Finding> {
    let mut findings = Vec::new();
    if body.is_empty() {
        return findings;
    }

    let document = Html::parse_document(body);
    let scripts = Selector::parse("script").expect("valid selector");
    let subresources =
        Selector::parse("img,script,link,iframe,video,audio,source").expect("valid selector");
    let all = Selector::parse("*").expect("valid selector");

    for element in document.select(&scripts) {
        if element.value().attr("src").is_none()
            && !element.text().collect::<String>().trim().is_empty()
        {
            findings.push(
                Finding::new(Severity::Low, "Inline script detected")
                    .with_details("Inline <script> present")
                    .with_remediation(
                        "Avoid inline scripts; use external scripts and CSP nonces/hashes.",
                    ),
            );
        }
    }

    for element in document.select(&all) {
        for (attr, _) in element.value().attrs() {
            if attr.len() > 2
                && attr.starts_with("on")
                && attr[2..].chars().all(|c| c.is_ascii_alphabetic())
            {
                findings.push(
                    Finding::new(Severity::Low, "Inline event handler detected")
                        .with_details(format!("{attr} on <{}>", element.value().name()))
                        .with_remediation(
                            "Avoid inline event handlers; use addEventListener and CSP.",
                        ),
                );
            }
        }
    }

    if https {
        for element in document.select(&subresources) {
            let src = element
                .value()
                .attr("src")
                .or_else(|| element.value().attr("href"));
            if let Some(src) = src {
                if src.to_ascii_lowercase().starts_with("http://") {
                    findings.push(
                        Finding::new(Severity::Medium, "Mixed content resource")
                            .with_details(src)
                            .with_remediation("Serve all resources over HTTPS."),
                    );
                }
            }
        }
    }

    findings
}
