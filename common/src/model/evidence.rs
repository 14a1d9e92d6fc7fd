use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One evidence record as the backend sends it.
///
/// Fields are deliberately lenient: `status` stays a raw string and most
/// fields are optional, because the dashboard transform (`crate::transform`)
/// is the single place that decides how missing or malformed values render.
/// Some producers also attach `category`, `title` and `gaps` inline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub job_id: String,
    pub control_id: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Model confidence in `[0, 1]`.
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub evidence_quote: Option<String>,
    #[serde(default)]
    pub source_location: Option<String>,
    #[serde(default)]
    pub source_document_ids: Option<Vec<String>>,
    #[serde(default)]
    pub evidence_metadata: Option<Value>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub gaps: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response of `GET /jobs/:id/evidence`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceList {
    #[serde(default, alias = "evidence")]
    pub evidence_items: Vec<EvidenceItem>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub passing: u32,
    #[serde(default)]
    pub failing: u32,
    #[serde(default)]
    pub needs_review: u32,
}
