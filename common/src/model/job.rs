use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::jobs::{JobStatus, progress_percent};

/// Which control set a job evaluates.
///
/// Deserialization never fails: a value other than `"quick"` or `"full"`
/// reads as the default, `Quick`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    /// The eight highest-signal controls.
    #[default]
    Quick,
    /// The complete SOC 2 control set.
    Full,
}

impl ScanType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "full" => ScanType::Full,
            "quick" => ScanType::Quick,
            other => {
                log::warn!("unknown scan type {other:?}, using quick");
                ScanType::default()
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Quick => "quick",
            ScanType::Full => "full",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScanType::Quick => "Quick scan",
            ScanType::Full => "Full scan",
        }
    }
}

impl<'de> Deserialize<'de> for ScanType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(raw) => ScanType::parse(&raw),
            _ => ScanType::default(),
        })
    }
}

/// One compliance scan against the user's documents.
///
/// The backend owns jobs; the client only ever holds a cached, read-only copy
/// that is refreshed by polling and invalidated by mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub job_type: String,
    /// Absent on jobs created before scan types existed.
    #[serde(default)]
    pub scan_type: Option<ScanType>,
    pub status: JobStatus,
    /// Number of controls evaluated so far.
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub total_controls: u32,
    /// Server-supplied reason when `status` is `FAILED`.
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Job {
    /// Heading used for the job in lists and the details page, e.g. `EVIDENCE_RUN Analysis`.
    pub fn display_name(&self) -> String {
        format!("{} Analysis", self.job_type.to_uppercase())
    }

    pub fn progress_percent(&self) -> u32 {
        progress_percent(self.progress, self.total_controls)
    }

    pub fn scan_type_or_default(&self) -> ScanType {
        self.scan_type.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_scan_type_does_not_sink_the_list() {
        let list: JobList = serde_json::from_value(json!({
            "jobs": [
                {"id": "j-1", "job_type": "evidence_run", "status": "SUCCEEDED", "scan_type": "full"},
                {"id": "j-2", "job_type": "evidence_run", "status": "PENDING", "scan_type": "deep"},
                {"id": "j-3", "job_type": "evidence_run", "status": "PENDING", "scan_type": 7},
                {"id": "j-4", "job_type": "evidence_run", "status": "PENDING", "scan_type": null}
            ],
            "total": 4
        }))
        .unwrap();

        let scan_types: Vec<Option<ScanType>> = list.jobs.iter().map(|job| job.scan_type).collect();
        assert_eq!(
            scan_types,
            vec![Some(ScanType::Full), Some(ScanType::Quick), Some(ScanType::Quick), None]
        );
        assert_eq!(list.jobs[3].scan_type_or_default(), ScanType::Quick);
    }

    #[test]
    fn scan_type_keeps_its_wire_form() {
        assert_eq!(serde_json::to_value(ScanType::Full).unwrap(), json!("full"));
        assert_eq!(ScanType::parse(" FULL "), ScanType::Full);
    }
}
