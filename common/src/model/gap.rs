use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Gap severity. Declaration order is display order: most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Unknown => "Unknown",
        }
    }
}

/// A deficiency recorded against one control within one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub id: String,
    #[serde(default)]
    pub job_id: String,
    pub control_id: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub remediation_suggestion: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response of `GET /jobs/:id/gaps`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapList {
    #[serde(default)]
    pub gaps: Vec<Gap>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub by_severity: BTreeMap<String, u32>,
}
