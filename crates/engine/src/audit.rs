//! Whole-library consistency audit.
//!
//! Everything that blocks nothing at write time — the advisory vector
//! balance, rationale coverage, vocabulary drift — surfaces here as
//! findings. Diagnostic only: distinct from [`crate::error::StoreError`]
//! and never raised by a write path.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use canon_core::model::{Cluster, Standard, APPRAISAL_DIMENSIONS};
use canon_core::vector::DIMENSIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// The record the finding is about: a standard id, or `CLUSTER:<id>`.
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.subject, self.message)
    }
}

pub fn has_errors(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}

/// Run every check over the whole collection pair.
pub fn audit(clusters: &[Cluster], standards: &[Standard]) -> Vec<Finding> {
    let mut findings = Vec::new();

    check_vectors(standards, &mut findings);
    check_cluster_references(clusters, standards, &mut findings);
    check_duplicate_ids(clusters, standards, &mut findings);
    check_required_fields(standards, &mut findings);
    check_rationale_coverage(standards, &mut findings);
    check_vocabulary(standards, &mut findings);

    findings
}

fn error(subject: &str, message: String) -> Finding {
    Finding {
        severity: Severity::Error,
        subject: subject.to_string(),
        message,
    }
}

fn warning(subject: &str, message: String) -> Finding {
    Finding {
        severity: Severity::Warning,
        subject: subject.to_string(),
        message,
    }
}

fn check_vectors(standards: &[Standard], findings: &mut Vec<Finding>) {
    for standard in standards {
        if !standard.mac_vector.is_balanced() {
            findings.push(error(
                &standard.id,
                format!(
                    "MAC vector sums to {:.4}, expected 1.0",
                    standard.mac_vector.sum()
                ),
            ));
        }
    }
}

fn check_cluster_references(
    clusters: &[Cluster],
    standards: &[Standard],
    findings: &mut Vec<Finding>,
) {
    let cluster_ids: HashSet<&str> = clusters.iter().map(|c| c.id.as_str()).collect();
    for standard in standards {
        if !cluster_ids.contains(standard.cluster.as_str()) {
            findings.push(error(
                &standard.id,
                format!("references nonexistent cluster '{}'", standard.cluster),
            ));
        }
    }
}

fn check_duplicate_ids(clusters: &[Cluster], standards: &[Standard], findings: &mut Vec<Finding>) {
    let mut seen = HashSet::new();
    for standard in standards {
        if !seen.insert(standard.id.as_str()) {
            findings.push(error(&standard.id, "duplicate standard id".into()));
        }
    }

    let mut seen = HashSet::new();
    for cluster in clusters {
        if !seen.insert(cluster.id.as_str()) {
            findings.push(error(
                &format!("CLUSTER:{}", cluster.id),
                "duplicate cluster id".into(),
            ));
        }
    }
}

fn check_required_fields(standards: &[Standard], findings: &mut Vec<Finding>) {
    for standard in standards {
        if standard.id.trim().is_empty() {
            findings.push(error("?", "missing id".into()));
        }
        if standard.name.trim().is_empty() {
            findings.push(error(&standard.id, "missing name".into()));
        }
        if standard.cluster.trim().is_empty() {
            findings.push(error(&standard.id, "missing cluster".into()));
        }
        if !(0.0..=1.0).contains(&standard.importance_weight) {
            findings.push(error(
                &standard.id,
                format!(
                    "importance weight {} not in [0, 1]",
                    standard.importance_weight
                ),
            ));
        }
    }
}

/// A dimension weighted above 0.1 deserves rationale text.
fn check_rationale_coverage(standards: &[Standard], findings: &mut Vec<Finding>) {
    for standard in standards {
        for dimension in DIMENSIONS {
            let weight = standard.mac_vector.get(dimension).unwrap_or(0.0);
            let text = standard.rationale.for_dimension(dimension).unwrap_or("");
            if weight > 0.1 && text.trim().is_empty() {
                findings.push(warning(
                    &standard.id,
                    format!("missing {dimension}_rationale (MAC value > 0.1)"),
                ));
            }
        }
    }
}

fn check_vocabulary(standards: &[Standard], findings: &mut Vec<Finding>) {
    for standard in standards {
        for tag in &standard.impacted_emotions {
            if !APPRAISAL_DIMENSIONS.contains(&tag.as_str()) {
                findings.push(warning(
                    &standard.id,
                    format!("unknown appraisal dimension '{tag}'"),
                ));
            }
        }
    }
}
