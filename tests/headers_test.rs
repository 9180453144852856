//! Integration tests for the headers probe

mod common;

use kestrel::http::HttpClient;
use kestrel::models::Severity;
use kestrel::scanner::headers::HeadersProbe;
use kestrel::scanner::Probe;
use kestrel::target::Target;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn missing_security_headers_are_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Type", "text/html"))
        .mount(&mock_server)
        .await;

    let config = common::test_config();
    let client = HttpClient::from_config(&config).expect("client");
    let target = Target::parse(&mock_server.uri()).expect("target");

    let findings = HeadersProbe
        .probe(&client, &target, &config)
        .await
        .expect("probe");

    let titles: Vec<&str> = findings.iter().map(|f| f.title.as_str()).collect();
    assert!(titles.contains(&"Missing Content-Security-Policy"));
    assert!(titles.contains(&"Missing X-Frame-Options"));
    assert!(titles.contains(&"Missing X-Content-Type-Options"));
    assert!(titles.contains(&"Missing Referrer-Policy"));
    assert!(titles.contains(&"Missing Permissions-Policy"));
    // http target that does not redirect to https
    assert!(titles.contains(&"HTTP not redirected to HTTPS"));
    // CSP is the High one
    let csp = findings
        .iter()
        .find(|f| f.title == "Missing Content-Security-Policy")
        .unwrap();
    assert_eq!(csp.severity, Severity::High);
}

#[tokio::test]
async fn hardened_response_yields_no_findings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("Location", "https://example.com/")
                .insert_header("Content-Security-Policy", "default-src 'self'")
                .insert_header("X-Frame-Options", "DENY")
                .insert_header("X-Content-Type-Options", "nosniff")
                .insert_header("Referrer-Policy", "strict-origin-when-cross-origin")
                .insert_header("Permissions-Policy", "camera=(), microphone=()"),
        )
        .mount(&mock_server)
        .await;

    let config = common::test_config();
    let client = HttpClient::from_config(&config).expect("client");
    let target = Target::parse(&mock_server.uri()).expect("target");

    let findings = HeadersProbe
        .probe(&client, &target, &config)
        .await
        .expect("probe");

    assert!(
        findings.is_empty(),
        "expected no findings, got: {:?}",
        findings.iter().map(|f| &f.title).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn cookie_flags_and_server_disclosure_are_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Server", "Apache/2.4.51 (Ubuntu)")
                .insert_header("Set-Cookie", "session=abc123; Path=/"),
        )
        .mount(&mock_server)
        .await;

    let config = common::test_config();
    let client = HttpClient::from_config(&config).expect("client");
    let target = Target::parse(&mock_server.uri()).expect("target");

    let findings = HeadersProbe
        .probe(&client, &target, &config)
        .await
        .expect("probe");

    let titles: Vec<&str> = findings.iter().map(|f| f.title.as_str()).collect();
    assert!(titles.contains(&"Server header reveals software"));
    assert!(titles.contains(&"Cookie without HttpOnly flag"));
    assert!(titles.contains(&"Cookie without SameSite attribute"));
    // Secure flag only checked over https
    assert!(!titles.contains(&"Cookie without Secure flag"));
}

#[tokio::test]
async fn valueless_samesite_cookie_is_flagged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "session=abc123; HttpOnly; SameSite"),
        )
        .mount(&mock_server)
        .await;

    let config = common::test_config();
    let client = HttpClient::from_config(&config).expect("client");
    let target = Target::parse(&mock_server.uri()).expect("target");

    let findings = HeadersProbe
        .probe(&client, &target, &config)
        .await
        .expect("probe");

    let titles: Vec<&str> = findings.iter().map(|f| f.title.as_str()).collect();
    // the attribute without Lax/Strict/None gives no protection
    assert!(titles.contains(&"Cookie without SameSite attribute"));
    assert!(!titles.contains(&"Cookie without HttpOnly flag"));
}

#[tokio::test]
async fn unreachable_host_yields_fetch_failure_finding() {
    let config = common::test_config();
    let client = HttpClient::from_config(&config).expect("client");
    // reserved TLD, never resolves
    let target = Target::parse("http://kestrel.invalid/").expect("target");

    let findings = HeadersProbe
        .probe(&client, &target, &config)
        .await
        .expect("probe");

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].title, "Failed to fetch headers");
    assert_eq!(findings[0].severity, Severity::High);
}
