//! Sample analysis for the demo tour.
//!
//! Everything here is static and needs no session: the results go through the
//! same `analysis_results` transform as a real job, so the demo renders with
//! the production dashboard components. Risk level, audit readiness and the
//! remediation plan are derived from those results.

use crate::jobs::JobStatus;
use crate::model::{EvidenceItem, EvidenceList, Gap, Job, ScanType, Severity};
use crate::transform::{AnalysisResults, ControlResult, ResultStatus, analysis_results};

pub const DEMO_ORGANIZATION: &str = "Acme Corporation";
pub const DEMO_JOB_ID: &str = "demo";

/// Overall exposure, from the compliance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn for_score(score: u32) -> Self {
        match score {
            90.. => RiskLevel::Minimal,
            75..=89 => RiskLevel::Low,
            60..=74 => RiskLevel::Medium,
            40..=59 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "Minimal",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            RiskLevel::Minimal | RiskLevel::Low => "badge badge-succeeded",
            RiskLevel::Medium => "badge badge-pending",
            RiskLevel::High | RiskLevel::Critical => "badge badge-failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditReadiness {
    Ready,
    AlmostReady,
    NeedsWork,
    NotReady,
}

impl AuditReadiness {
    pub fn assess(score: u32, critical_gaps: u32) -> Self {
        if score >= 85 && critical_gaps == 0 {
            AuditReadiness::Ready
        } else if score >= 70 && critical_gaps <= 2 {
            AuditReadiness::AlmostReady
        } else if score >= 50 {
            AuditReadiness::NeedsWork
        } else {
            AuditReadiness::NotReady
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuditReadiness::Ready => "Ready",
            AuditReadiness::AlmostReady => "Almost Ready",
            AuditReadiness::NeedsWork => "Needs Work",
            AuditReadiness::NotReady => "Not Ready",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "schedule",
            TaskStatus::InProgress => "autorenew",
            TaskStatus::Completed => "check_circle",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemediationTask {
    pub id: String,
    pub control_id: String,
    pub title: String,
    pub priority: Severity,
    pub status: TaskStatus,
    pub estimated_hours: u32,
    /// Relative target, e.g. `2 weeks`.
    pub due: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemediationPlan {
    /// Highest priority first.
    pub tasks: Vec<RemediationTask>,
}

impl RemediationPlan {
    pub fn total_tasks(&self) -> u32 {
        self.tasks.len() as u32
    }

    pub fn completed_tasks(&self) -> u32 {
        self.tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
            .count() as u32
    }

    pub fn progress_percent(&self) -> u32 {
        crate::jobs::progress_percent(self.completed_tasks(), self.total_tasks())
    }

    pub fn total_hours(&self) -> u32 {
        self.tasks.iter().map(|task| task.estimated_hours).sum()
    }
}

/// The demo tour's whole data set.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoAnalysis {
    pub organization: String,
    pub results: AnalysisResults,
    pub gaps: Vec<Gap>,
    pub plan: RemediationPlan,
    pub recommendations: Vec<String>,
}

impl DemoAnalysis {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::for_score(self.results.score())
    }

    pub fn readiness(&self) -> AuditReadiness {
        let critical = self
            .gaps
            .iter()
            .filter(|gap| gap.severity == Severity::Critical)
            .count() as u32;
        AuditReadiness::assess(self.results.score(), critical)
    }
}

/// One gap per listed deficiency of every control that did not pass. A
/// failing control's gaps are critical, a control needing review gets
/// medium ones. A control with no listed deficiency still yields one gap.
pub fn derive_gaps(job_id: &str, controls: &[ControlResult]) -> Vec<Gap> {
    let mut gaps = Vec::new();
    for result in controls {
        let severity = match result.status {
            ResultStatus::Pass => continue,
            ResultStatus::Fail => Severity::Critical,
            ResultStatus::NeedsReview => Severity::Medium,
        };
        let descriptions = if result.gaps.is_empty() {
            vec![format!("{} requires attention", result.title)]
        } else {
            result.gaps.clone()
        };
        for description in descriptions {
            gaps.push(Gap {
                id: format!("{}-{}-{}", job_id, result.control_id, gaps.len() + 1),
                job_id: job_id.to_string(),
                control_id: result.control_id.clone(),
                severity,
                description,
                remediation_suggestion: None,
                created_at: None,
            });
        }
    }
    gaps
}

fn item(
    control_id: &str,
    category: &str,
    title: &str,
    status: &str,
    confidence: f64,
    summary: &str,
    gaps: &[&str],
) -> EvidenceItem {
    EvidenceItem {
        id: format!("demo-{control_id}"),
        job_id: DEMO_JOB_ID.to_string(),
        control_id: control_id.to_string(),
        status: Some(status.to_string()),
        confidence: Some(confidence),
        summary: Some(summary.to_string()),
        category: Some(category.to_string()),
        title: Some(title.to_string()),
        gaps: Some(gaps.iter().map(|gap| gap.to_string()).collect()),
        ..EvidenceItem::default()
    }
}

pub fn demo_job() -> Job {
    Job {
        id: DEMO_JOB_ID.to_string(),
        job_type: "evidence_run".to_string(),
        scan_type: Some(ScanType::Quick),
        status: JobStatus::Succeeded,
        progress: 8,
        total_controls: 8,
        error_message: None,
        started_at: None,
        completed_at: None,
        created_at: None,
    }
}

pub fn demo_evidence() -> EvidenceList {
    let items = vec![
        item("CC6.1", "Security", "Logical Access Security", "pass", 0.92,
            "Strong access controls with MFA and RBAC implemented.", &[]),
        item("CC6.2", "Security", "User Registration", "pass", 0.88,
            "Documented onboarding with manager approval workflow.", &[]),
        item("CC6.3", "Security", "Access Removal", "needs_review", 0.65,
            "Termination procedures exist but need documentation.",
            &["Automated deprovisioning not documented", "Transfer procedures missing"]),
        item("CC7.3", "Security", "Incident Response", "pass", 0.85,
            "IR plan with severity levels and escalation paths.", &[]),
        item("CC8.1", "Security", "Change Management", "pass", 0.90,
            "Formal CAB approval with testing requirements.", &[]),
        item("CC9.1", "Security", "Risk Assessment", "fail", 0.78,
            "No documented risk assessment methodology found.",
            &["No risk register", "No risk treatment plans", "Annual review not evidenced"]),
        item("A1.2", "Availability", "Backup and Recovery", "pass", 0.95,
            "Comprehensive backup with 4-hour RTO, 1-hour RPO.", &[]),
        item("PI1.1", "Processing Integrity", "Processing Integrity", "needs_review", 0.55,
            "Data validation exists but needs better documentation.",
            &["Validation rules not documented", "Error handling procedures unclear"]),
    ];
    EvidenceList {
        total: items.len() as u32,
        evidence_items: items,
        ..EvidenceList::default()
    }
}

fn task(id: &str, control_id: &str, title: &str, priority: Severity, hours: u32, due: &str) -> RemediationTask {
    RemediationTask {
        id: id.to_string(),
        control_id: control_id.to_string(),
        title: title.to_string(),
        priority,
        status: TaskStatus::NotStarted,
        estimated_hours: hours,
        due: due.to_string(),
    }
}

pub fn demo_plan() -> RemediationPlan {
    RemediationPlan {
        tasks: vec![
            task("1", "CC9.1", "Implement Risk Assessment Program", Severity::Critical, 40, "2 weeks"),
            task("2", "CC6.3", "Document Access Removal Procedures", Severity::High, 24, "4 weeks"),
            task("3", "PI1.1", "Document Processing Validation", Severity::Medium, 32, "8 weeks"),
        ],
    }
}

pub fn demo_analysis() -> DemoAnalysis {
    let results = analysis_results(&demo_job(), &demo_evidence(), None);
    let gaps = derive_gaps(DEMO_JOB_ID, &results.controls);
    let critical = gaps.iter().filter(|gap| gap.severity == Severity::Critical).count();
    DemoAnalysis {
        organization: DEMO_ORGANIZATION.to_string(),
        recommendations: vec![
            "Priority: implement a formal risk assessment methodology".to_string(),
            format!("Address {critical} critical gap(s) before the audit"),
            "Document existing access removal procedures".to_string(),
            "Implement continuous monitoring for processing integrity".to_string(),
            "Maintain the current security posture".to_string(),
        ],
        results,
        gaps,
        plan: demo_plan(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn demo_runs_through_the_real_transform() {
        let demo = demo_analysis();
        let results = &demo.results;

        assert_eq!((results.passing, results.failing, results.needs_review), (5, 1, 2));
        assert_eq!(results.total_controls, 8);
        assert_eq!(results.score(), 63);
        assert_eq!(
            results.category_names(),
            vec!["Security", "Availability", "Processing Integrity"]
        );
        assert_eq!(demo.risk_level(), RiskLevel::Medium);
        assert_eq!(demo.readiness(), AuditReadiness::NeedsWork);
    }

    #[test]
    fn gaps_follow_non_passing_controls() {
        let demo = demo_analysis();
        let by_control: Vec<(&str, Severity)> = demo
            .gaps
            .iter()
            .map(|gap| (gap.control_id.as_str(), gap.severity))
            .collect();

        assert_eq!(by_control.len(), 7);
        assert_eq!(by_control.iter().filter(|(id, _)| *id == "CC9.1").count(), 3);
        assert!(by_control.iter().all(|(id, severity)| match *id {
            "CC9.1" => *severity == Severity::Critical,
            _ => *severity == Severity::Medium,
        }));
    }

    #[test]
    fn control_without_listed_gaps_still_gets_one() {
        let mut results = demo_analysis().results;
        results.controls.retain(|c| c.control_id == "CC9.1");
        results.controls[0].gaps.clear();

        let gaps = derive_gaps("j-1", &results.controls);

        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].description, "Risk Assessment requires attention");
    }

    #[test]
    fn plan_totals() {
        let plan = demo_plan();
        assert_eq!(plan.total_tasks(), 3);
        assert_eq!(plan.completed_tasks(), 0);
        assert_eq!(plan.progress_percent(), 0);
        assert_eq!(plan.total_hours(), 96);
    }

    #[test]
    fn risk_and_readiness_thresholds() {
        assert_eq!(RiskLevel::for_score(90), RiskLevel::Minimal);
        assert_eq!(RiskLevel::for_score(75), RiskLevel::Low);
        assert_eq!(RiskLevel::for_score(59), RiskLevel::High);
        assert_eq!(RiskLevel::for_score(0), RiskLevel::Critical);
        assert_eq!(AuditReadiness::assess(90, 0), AuditReadiness::Ready);
        assert_eq!(AuditReadiness::assess(90, 1), AuditReadiness::AlmostReady);
        assert_eq!(AuditReadiness::assess(72, 3), AuditReadiness::NeedsWork);
        assert_eq!(AuditReadiness::assess(30, 0), AuditReadiness::NotReady);
    }
}
