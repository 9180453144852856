//! Core data models for the Kestrel scanner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for security findings, ordered from least to most severe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "Info"),
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
            Severity::Critical => write!(f, "Critical"),
        }
    }
}

impl Severity {
    /// Numeric rank used for comparisons and min-severity filtering
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Info => 1,
            Severity::Low => 2,
            Severity::Medium => 3,
            Severity::High => 4,
            Severity::Critical => 5,
        }
    }

    /// Maps an arbitrary external risk label into one of the five known
    /// levels. Unrecognized or empty labels map to `Info`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Info,
        }
    }
}

/// A security finding discovered during scanning. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Severity level
    pub severity: Severity,
    /// Short name of the finding
    pub title: String,
    /// Detailed description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Technical evidence (payload, header value, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    /// Remediation recommendation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl Finding {
    /// Creates a new Finding with the given severity and title
    pub fn new(severity: Severity, title: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            details: None,
            evidence: None,
            remediation: None,
        }
    }

    /// Sets the details for this finding
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Sets the evidence for this finding
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    /// Sets the remediation recommendation for this finding
    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }
}

/// Per-severity counts over a finding list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub info_count: usize,
    pub low_count: usize,
    pub medium_count: usize,
    pub high_count: usize,
    pub critical_count: usize,
}

impl Summary {
    /// Canonical derivation of the summary: full reduction over the
    /// finding list. This is the rule of record; any counters kept while
    /// accumulating findings are replaced by this at the end of a scan.
    pub fn recompute(findings: &[Finding]) -> Self {
        let mut summary = Summary {
            total: findings.len(),
            ..Summary::default()
        };
        for finding in findings {
            match finding.severity {
                Severity::Info => summary.info_count += 1,
                Severity::Low => summary.low_count += 1,
                Severity::Medium => summary.medium_count += 1,
                Severity::High => summary.high_count += 1,
                Severity::Critical => summary.critical_count += 1,
            }
        }
        summary
    }

    fn bump(&mut self, severity: Severity) {
        self.total += 1;
        match severity {
            Severity::Info => self.info_count += 1,
            Severity::Low => self.low_count += 1,
            Severity::Medium => self.medium_count += 1,
            Severity::High => self.high_count += 1,
            Severity::Critical => self.critical_count += 1,
        }
    }
}

/// Result of a complete scan against one target
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Target URL as given by the caller
    pub target_url: String,
    /// Scan start time
    pub scanned_at: DateTime<Utc>,
    /// All findings, in fixed probe order
    pub findings: Vec<Finding>,
    /// Severity counts over `findings`
    pub summary: Summary,
}

impl ScanResult {
    /// Creates an empty ScanResult stamped with the current time
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            scanned_at: Utc::now(),
            findings: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Appends a finding and bumps the matching severity bucket. The
    /// engine still recomputes the summary over the final list; these
    /// running counts exist so a partially built result stays consistent.
    pub fn add_finding(&mut self, finding: Finding) {
        self.summary.bump(finding.severity);
        self.findings.push(finding);
    }
}

/// Open/closed classification for a single probed port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortProbeResult {
    pub port: u16,
    pub open: bool,
}

/// Read-only severity-floor view over a finding list. Used for human
/// rendering only; the stored findings and summary are never altered.
pub fn filter_by_min_severity(findings: &[Finding], floor: Severity) -> Vec<&Finding> {
    findings
        .iter()
        .filter(|f| f.severity.rank() >= floor.rank())
        .collect()
}
