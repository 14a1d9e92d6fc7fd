pub mod analysis_dashboard;
pub mod compliance_score;
pub mod control_card;
pub mod gaps_report;
pub mod helpers;
pub mod onboarding;
pub mod recent_jobs;
