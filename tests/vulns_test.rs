//! Integration tests for the injection/DOM heuristics probe

mod common;

use kestrel::http::HttpClient;
use kestrel::models::Severity;
use kestrel::scanner::vulns::VulnsProbe;
use kestrel::scanner::Probe;
use kestrel::target::Target;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn reflected_payload_is_flagged_as_xss() {
    let mock_server = MockServer::start().await;

    // echoes the payload back regardless of query
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body>you searched for <script>alert('xss')</script></body></html>",
        ))
        .mount(&mock_server)
        .await;

    let config = common::test_config();
    let client = HttpClient::from_config(&config).expect("client");
    let target = Target::parse(&mock_server.uri()).expect("target");

    let findings = VulnsProbe
        .probe(&client, &target, &config)
        .await
        .expect("probe");

    let xss = findings
        .iter()
        .find(|f| f.title == "Potential reflected XSS")
        .expect("XSS finding");
    assert_eq!(xss.severity, Severity::High);
    // the reflected payload also shows up as an inline script in the DOM pass
    assert!(findings
        .iter()
        .any(|f| f.title == "Inline script detected"));
}

#[tokio::test]
async fn server_error_on_sqli_payload_is_flagged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = common::test_config();
    let client = HttpClient::from_config(&config).expect("client");
    let target = Target::parse(&mock_server.uri()).expect("target");

    let findings = VulnsProbe
        .probe(&client, &target, &config)
        .await
        .expect("probe");

    let titles: Vec<&str> = findings.iter().map(|f| f.title.as_str()).collect();
    assert!(titles.contains(&"Possible SQL injection error behavior"));
    // a 500 is not a reflection
    assert!(!titles.contains(&"Potential reflected XSS"));
}

#[tokio::test]
async fn sql_error_keywords_in_body_are_flagged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body>You have an error in your SQL syntax near 'OR'</body></html>",
        ))
        .mount(&mock_server)
        .await;

    let config = common::test_config();
    let client = HttpClient::from_config(&config).expect("client");
    let target = Target::parse(&mock_server.uri()).expect("target");

    let findings = VulnsProbe
        .probe(&client, &target, &config)
        .await
        .expect("probe");

    assert!(findings
        .iter()
        .any(|f| f.title == "Potential SQL error leakage" && f.severity == Severity::Medium));
}

#[tokio::test]
async fn clean_page_yields_no_findings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>hello</p></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let config = common::test_config();
    let client = HttpClient::from_config(&config).expect("client");
    let target = Target::parse(&mock_server.uri()).expect("target");

    let findings = VulnsProbe
        .probe(&client, &target, &config)
        .await
        .expect("probe");

    assert!(
        findings.is_empty(),
        "expected no findings, got: {:?}",
        findings.iter().map(|f| &f.title).collect::<Vec<_>>()
    );
}
