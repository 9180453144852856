//! Human-readable report rendering

use crate::models::{filter_by_min_severity, Finding, ScanResult, Severity};
use colored::Colorize;
use std::fmt::Write;
use tabled::builder::Builder;
use tabled::settings::Style;

fn severity_tag(severity: Severity) -> String {
    let label = severity.to_string();
    match severity {
        Severity::Critical => label.red().bold().to_string(),
        Severity::High => label.bright_red().to_string(),
        Severity::Medium => label.yellow().to_string(),
        Severity::Low => label.blue().to_string(),
        Severity::Info => label.white().to_string(),
    }
}

fn summary_table(result: &ScanResult) -> String {
    let rows = [
        ("Critical", result.summary.critical_count),
        ("High", result.summary.high_count),
        ("Medium", result.summary.medium_count),
        ("Low", result.summary.low_count),
        ("Info", result.summary.info_count),
        ("Total", result.summary.total),
    ];

    let mut builder = Builder::default();
    builder.push_record(["Severity", "Count"]);
    for (label, count) in rows {
        builder.push_record([label.to_string(), count.to_string()]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn write_finding(out: &mut String, finding: &Finding) {
    let _ = writeln!(
        out,
        "- [{}] {}",
        severity_tag(finding.severity),
        finding.title
    );
    if let Some(ref details) = finding.details {
        let _ = writeln!(out, "  details: {details}");
    }
    if let Some(ref evidence) = finding.evidence {
        let _ = writeln!(out, "  evidence: {evidence}");
    }
    if let Some(ref remediation) = finding.remediation {
        let _ = writeln!(out, "  remediation: {remediation}");
    }
}

/// Renders the scan result for terminal output. The severity floor only
/// filters what is shown; the result itself stays untouched.
pub fn render(result: &ScanResult, floor: Severity) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "Target:".bold(), result.target_url);
    let _ = writeln!(out, "{} {}", "Scanned:".bold(), result.scanned_at);
    let _ = writeln!(out, "{}", summary_table(result));

    let visible = filter_by_min_severity(&result.findings, floor);
    let _ = writeln!(out, "{}", "Findings:".bold());
    if visible.is_empty() {
        let _ = writeln!(out, "  (none at or above {floor})");
    }
    for finding in visible {
        write_finding(&mut out, finding);
    }
    out
}
