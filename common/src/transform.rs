//! Reshapes backend payloads into what the dashboard renders.
//!
//! Every fallback the views rely on lives here, once: an evidence status that
//! is not `pass`, `fail` or `needs_review` becomes `needs_review`, a missing
//! confidence becomes `0.5`, a missing category `General`, a missing title the
//! control id, and missing gaps an empty list. When a control catalog is at
//! hand it fills category and title before the literal defaults apply.
//!
//! All functions are pure. Normalizing an already normalized list changes
//! nothing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::jobs::JobStatus;
use crate::model::{
    CheckType, Control, ControlCatalog, EvidenceItem, EvidenceList, Gap, Job, ScanType, Severity,
};

pub const DEFAULT_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Pass,
    Fail,
    #[default]
    NeedsReview,
}

impl ResultStatus {
    /// Canonical status rule: exact `pass`, `fail` or `needs_review`, anything
    /// else (missing, differently cased, unknown) is `NeedsReview`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("pass") => ResultStatus::Pass,
            Some("fail") => ResultStatus::Fail,
            _ => ResultStatus::NeedsReview,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Pass => "pass",
            ResultStatus::Fail => "fail",
            ResultStatus::NeedsReview => "needs_review",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResultStatus::Pass => "Pass",
            ResultStatus::Fail => "Fail",
            ResultStatus::NeedsReview => "Needs Review",
        }
    }
}

/// One control's result with every field resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlResult {
    pub control_id: String,
    pub category: String,
    pub title: String,
    pub status: ResultStatus,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub summary: Option<String>,
    pub evidence_quote: Option<String>,
    pub source_location: Option<String>,
    pub check_type: Option<CheckType>,
    pub description: Option<String>,
    pub gaps: Vec<String>,
}

impl ControlResult {
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

impl From<&ControlResult> for EvidenceItem {
    fn from(result: &ControlResult) -> Self {
        EvidenceItem {
            control_id: result.control_id.clone(),
            status: Some(result.status.as_str().to_string()),
            confidence: Some(result.confidence),
            summary: result.summary.clone(),
            evidence_quote: result.evidence_quote.clone(),
            source_location: result.source_location.clone(),
            category: Some(result.category.clone()),
            title: Some(result.title.clone()),
            gaps: Some(result.gaps.clone()),
            ..EvidenceItem::default()
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn normalize_confidence(raw: Option<f64>) -> f64 {
    match raw {
        Some(value) if !value.is_nan() => value.clamp(0.0, 1.0),
        _ => DEFAULT_CONFIDENCE,
    }
}

pub fn normalize_item(item: &EvidenceItem, catalog: Option<&ControlCatalog>) -> ControlResult {
    let control = catalog.and_then(|catalog| catalog.get(&item.control_id));

    let category = present(item.category.as_deref())
        .or_else(|| control.and_then(|c| present(Some(c.category.as_str()))))
        .unwrap_or(DEFAULT_CATEGORY);
    let title = present(item.title.as_deref())
        .or_else(|| control.and_then(|c| present(Some(c.title.as_str()))))
        .unwrap_or(item.control_id.as_str());

    ControlResult {
        control_id: item.control_id.clone(),
        category: category.to_string(),
        title: title.to_string(),
        status: ResultStatus::from_raw(item.status.as_deref()),
        confidence: normalize_confidence(item.confidence),
        summary: present(item.summary.as_deref()).map(str::to_string),
        evidence_quote: present(item.evidence_quote.as_deref()).map(str::to_string),
        source_location: present(item.source_location.as_deref()).map(str::to_string),
        check_type: control.map(|c| c.check_type),
        description: control
            .and_then(|c| present(Some(c.description.as_str())))
            .map(str::to_string),
        gaps: item.gaps.clone().unwrap_or_default(),
    }
}

pub fn normalize_evidence(items: &[EvidenceItem], catalog: Option<&ControlCatalog>) -> Vec<ControlResult> {
    items.iter().map(|item| normalize_item(item, catalog)).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub passing: u32,
    pub failing: u32,
    pub needs_review: u32,
}

impl Tally {
    pub fn total(&self) -> u32 {
        self.passing + self.failing + self.needs_review
    }

    pub fn score(&self) -> u32 {
        compliance_score(self.passing, self.total())
    }
}

/// Counts results by canonical status; the counts always sum to `results.len()`.
pub fn tally(results: &[ControlResult]) -> Tally {
    results.iter().fold(Tally::default(), |mut tally, result| {
        match result.status {
            ResultStatus::Pass => tally.passing += 1,
            ResultStatus::Fail => tally.failing += 1,
            ResultStatus::NeedsReview => tally.needs_review += 1,
        }
        tally
    })
}

/// `round(passing / total * 100)` with halves rounded up; 0 when `total` is 0.
pub fn compliance_score(passing: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let passing = u64::from(passing.min(total));
    let total = u64::from(total);
    ((passing * 200 + total) / (2 * total)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn for_score(score: u32) -> Self {
        match score {
            80.. => ScoreBand::Good,
            50..=79 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreBand::Good => "score-good",
            ScoreBand::Fair => "score-fair",
            ScoreBand::Poor => "score-poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub name: String,
    pub passing: u32,
    pub total: u32,
}

impl CategoryBreakdown {
    pub fn score(&self) -> u32 {
        compliance_score(self.passing, self.total)
    }
}

/// Everything the analysis dashboard shows for one finished job.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResults {
    pub job_id: String,
    pub created_at: Option<String>,
    pub scan_type: ScanType,
    pub total_controls: u32,
    pub passing: u32,
    pub failing: u32,
    pub needs_review: u32,
    pub controls: Vec<ControlResult>,
    pub categories: Vec<CategoryBreakdown>,
}

impl AnalysisResults {
    pub fn score(&self) -> u32 {
        compliance_score(self.passing, self.total_controls)
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.score())
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Builds the dashboard model. Counts come from the normalized items when
/// there are any, otherwise from the counts the server reported.
pub fn analysis_results(
    job: &Job,
    evidence: &EvidenceList,
    catalog: Option<&ControlCatalog>,
) -> AnalysisResults {
    let controls = normalize_evidence(&evidence.evidence_items, catalog);
    let counts = if controls.is_empty() {
        Tally {
            passing: evidence.passing,
            failing: evidence.failing,
            needs_review: evidence.needs_review,
        }
    } else {
        tally(&controls)
    };
    let total_controls = job
        .total_controls
        .max(evidence.total)
        .max(controls.len() as u32);

    AnalysisResults {
        job_id: job.id.clone(),
        created_at: job.created_at.clone(),
        scan_type: job.scan_type_or_default(),
        total_controls,
        passing: counts.passing,
        failing: counts.failing,
        needs_review: counts.needs_review,
        categories: category_breakdown(&controls),
        controls,
    }
}

/// Per-category pass counts, in order of first appearance.
pub fn category_breakdown(results: &[ControlResult]) -> Vec<CategoryBreakdown> {
    let mut breakdown: Vec<CategoryBreakdown> = Vec::new();
    for result in results {
        let entry = match breakdown.iter().position(|b| b.name == result.category) {
            Some(index) => &mut breakdown[index],
            None => {
                breakdown.push(CategoryBreakdown {
                    name: result.category.clone(),
                    passing: 0,
                    total: 0,
                });
                let last = breakdown.len() - 1;
                &mut breakdown[last]
            }
        };
        entry.total += 1;
        if result.status == ResultStatus::Pass {
            entry.passing += 1;
        }
    }
    breakdown
}

/// `None` means "all" for either filter.
pub fn filter_controls<'a>(
    results: &'a [ControlResult],
    category: Option<&str>,
    status: Option<ResultStatus>,
) -> Vec<&'a ControlResult> {
    results
        .iter()
        .filter(|r| category.is_none_or(|c| r.category == c))
        .filter(|r| status.is_none_or(|s| r.status == s))
        .collect()
}

/// Reference-browser filter: `query` matches id, title, description or
/// category case-insensitively; a blank query matches everything.
pub fn search_controls<'a>(
    controls: &'a [Control],
    query: &str,
    category: Option<&str>,
) -> Vec<&'a Control> {
    let query = query.trim().to_lowercase();
    controls
        .iter()
        .filter(|c| category.is_none_or(|name| c.category == name))
        .filter(|c| {
            query.is_empty()
                || [&c.control_id, &c.title, &c.description, &c.category]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GapReport {
    /// Most severe first; backend order is kept within a severity.
    pub gaps: Vec<Gap>,
    pub counts: BTreeMap<Severity, u32>,
}

impl GapReport {
    pub fn new(gaps: &[Gap]) -> Self {
        let mut sorted = gaps.to_vec();
        sorted.sort_by_key(|gap| gap.severity);
        let mut counts = BTreeMap::new();
        for gap in &sorted {
            *counts.entry(gap.severity).or_insert(0) += 1;
        }
        Self { gaps: sorted, counts }
    }

    pub fn count(&self, severity: Severity) -> u32 {
        self.counts.get(&severity).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }
}

pub fn recent_jobs(jobs: &[Job], n: usize) -> &[Job] {
    &jobs[..jobs.len().min(n)]
}

pub fn latest_succeeded(jobs: &[Job]) -> Option<&Job> {
    jobs.iter().find(|job| job.status == JobStatus::Succeeded)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::model::Control;

    fn item(control_id: &str, status: Option<&str>) -> EvidenceItem {
        EvidenceItem {
            control_id: control_id.to_string(),
            status: status.map(str::to_string),
            ..EvidenceItem::default()
        }
    }

    fn control(control_id: &str, category: &str, title: &str) -> Control {
        Control {
            id: format!("c-{control_id}"),
            control_id: control_id.to_string(),
            framework: "soc2".to_string(),
            title: title.to_string(),
            description: String::new(),
            check_type: CheckType::AiPrompt,
            category: category.to_string(),
            required_file_types: None,
        }
    }

    #[test]
    fn bare_item_gets_every_default() {
        let result = normalize_item(&item("CC6.1", None), None);
        assert_eq!(result.status, ResultStatus::NeedsReview);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.category, "General");
        assert_eq!(result.title, "CC6.1");
        assert!(result.gaps.is_empty());
        assert_eq!(result.description, None);
    }

    #[test]
    fn present_values_win_over_catalog() {
        let catalog: ControlCatalog =
            std::iter::once(control("CC6.1", "Access Control", "Logical Access")).collect();
        let mut raw = item("CC6.1", Some("pass"));
        raw.title = Some("Custom".into());
        raw.confidence = Some(0.9);

        let result = normalize_item(&raw, Some(&catalog));
        assert_eq!(result.title, "Custom");
        assert_eq!(result.category, "Access Control");
        assert_eq!(result.check_type, Some(CheckType::AiPrompt));
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn odd_statuses_become_needs_review() {
        for raw in ["PASS", "passed", "not_applicable", "error", ""] {
            assert_eq!(ResultStatus::from_raw(Some(raw)), ResultStatus::NeedsReview, "{raw}");
        }
    }

    #[test]
    fn confidence_is_clamped_and_nan_defaults() {
        assert_eq!(normalize_confidence(Some(1.7)), 1.0);
        assert_eq!(normalize_confidence(Some(-0.2)), 0.0);
        assert_eq!(normalize_confidence(Some(f64::NAN)), 0.5);
    }

    #[test]
    fn score_rounds_half_up() {
        assert_eq!(compliance_score(5, 8), 63);
        assert_eq!(compliance_score(1, 8), 13);
        assert_eq!(compliance_score(0, 0), 0);
        assert_eq!(compliance_score(8, 8), 100);
        assert_eq!(ScoreBand::for_score(80), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(63), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_score(49), ScoreBand::Poor);
    }

    #[test]
    fn breakdown_keeps_first_appearance_order() {
        let mut a = item("A1", Some("pass"));
        a.category = Some("Risk".into());
        let mut b = item("B1", Some("fail"));
        b.category = Some("Access".into());
        let mut c = item("A2", Some("pass"));
        c.category = Some("Risk".into());

        let results = normalize_evidence(&[a, b, c], None);
        assert_eq!(
            category_breakdown(&results),
            vec![
                CategoryBreakdown { name: "Risk".into(), passing: 2, total: 2 },
                CategoryBreakdown { name: "Access".into(), passing: 0, total: 1 },
            ]
        );

        let risky = filter_controls(&results, Some("Risk"), Some(ResultStatus::Pass));
        assert_eq!(risky.len(), 2);
        assert!(filter_controls(&results, None, Some(ResultStatus::NeedsReview)).is_empty());
    }

    #[test]
    fn control_search_spans_fields_and_category() {
        let controls = vec![
            control("CC6.1", "Logical and Physical Access", "Logical Access Security"),
            control("CC7.2", "System Operations", "Security Event Monitoring"),
        ];
        let ids = |found: Vec<&Control>| -> Vec<String> {
            found.into_iter().map(|c| c.control_id.clone()).collect()
        };

        assert_eq!(ids(search_controls(&controls, "  ", None)).len(), 2);
        assert_eq!(ids(search_controls(&controls, "cc7", None)), vec!["CC7.2"]);
        assert_eq!(ids(search_controls(&controls, "security", None)).len(), 2);
        assert_eq!(
            ids(search_controls(&controls, "security", Some("System Operations"))),
            vec!["CC7.2"]
        );
    }

    #[test]
    fn gaps_sort_by_severity_stably() {
        let gap = |id: &str, severity| Gap {
            id: id.into(),
            job_id: "j".into(),
            control_id: "CC1.1".into(),
            severity,
            description: String::new(),
            remediation_suggestion: None,
            created_at: None,
        };
        let report = GapReport::new(&[
            gap("1", Severity::Low),
            gap("2", Severity::Critical),
            gap("3", Severity::Low),
            gap("4", Severity::High),
        ]);
        let order: Vec<&str> = report.gaps.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(order, vec!["2", "4", "1", "3"]);
        assert_eq!(report.count(Severity::Low), 2);
        assert_eq!(report.count(Severity::Medium), 0);
    }

    fn any_item() -> impl Strategy<Value = EvidenceItem> {
        (
            prop_oneof!["CC6\\.1", "CC7\\.2", "[A-Z]{2}[0-9]\\.[0-9]"],
            proptest::option::of(".{0,12}"),
            proptest::option::of(any::<f64>()),
            proptest::option::of("[A-Za-z ]{0,10}"),
            proptest::option::of(proptest::collection::vec(".{0,8}", 0..3)),
        )
            .prop_map(|(control_id, status, confidence, category, gaps)| EvidenceItem {
                control_id,
                status,
                confidence,
                category,
                gaps,
                ..EvidenceItem::default()
            })
    }

    fn sample_catalog() -> ControlCatalog {
        [
            Control {
                description: "Restricts logical access to information assets.".to_string(),
                ..control("CC6.1", "Logical and Physical Access", "Logical Access Security")
            },
            control("CC7.2", "System Operations", "Security Event Monitoring"),
        ]
        .into_iter()
        .collect()
    }

    proptest! {
        #[test]
        fn normalizing_against_a_catalog_twice_changes_nothing(
            items in proptest::collection::vec(any_item(), 0..8)
        ) {
            let catalog = sample_catalog();
            let once = normalize_evidence(&items, Some(&catalog));
            let again: Vec<EvidenceItem> = once.iter().map(EvidenceItem::from).collect();
            prop_assert_eq!(normalize_evidence(&again, Some(&catalog)), once);
        }

        #[test]
        fn normalizing_twice_changes_nothing(items in proptest::collection::vec(any_item(), 0..8)) {
            let once = normalize_evidence(&items, None);
            let again: Vec<EvidenceItem> = once.iter().map(EvidenceItem::from).collect();
            prop_assert_eq!(normalize_evidence(&again, None), once);
        }

        #[test]
        fn tally_sums_to_item_count(items in proptest::collection::vec(any_item(), 0..16)) {
            let results = normalize_evidence(&items, None);
            prop_assert_eq!(tally(&results).total() as usize, results.len());
        }
    }
}
