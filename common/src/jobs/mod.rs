//! Job lifecycle as observed by the client.
//!
//! A job moves linearly through `PENDING → RUNNING → {SUCCEEDED, FAILED,
//! CANCELLED}`. The first two states are live (the client keeps polling), the
//! last three are terminal and absorb: once one is observed, nothing about the
//! job changes until the user explicitly re-runs it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

mod poller;

pub use poller::{JobPoller, PollOutcome, PollUpdate};

/// Wire form is upper case. A status this client does not know reads as
/// `Pending`: still live, so a job in it keeps being polled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => JobStatus::Pending,
            "RUNNING" => JobStatus::Running,
            "SUCCEEDED" => JobStatus::Succeeded,
            "FAILED" => JobStatus::Failed,
            "CANCELLED" => JobStatus::Cancelled,
            other => {
                log::warn!("unknown job status {other:?}, treating as PENDING");
                JobStatus::Pending
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// The backend only accepts `POST /jobs/:id/run` for pending or failed jobs.
    pub fn can_run(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }

    /// Heading shown while a job is followed.
    pub fn headline(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Waiting to Start",
            JobStatus::Running => "Analyzing Documents...",
            JobStatus::Succeeded => "Analysis Complete",
            JobStatus::Failed => "Analysis Failed",
            JobStatus::Cancelled => "Analysis Cancelled",
        }
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(raw) => JobStatus::parse(&raw),
            _ => JobStatus::Pending,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("job cannot move from {} to {}", .from.as_str(), .to.as_str())]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Statuses reachable from `from` in one observed step, excluding `from` itself.
pub fn allowed_transitions(from: JobStatus) -> &'static [JobStatus] {
    match from {
        JobStatus::Pending => &[
            JobStatus::Running,
            JobStatus::Succeeded,
            JobStatus::Failed,
            JobStatus::Cancelled,
        ],
        JobStatus::Running => &[JobStatus::Succeeded, JobStatus::Failed, JobStatus::Cancelled],
        JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled => &[],
    }
}

/// Checks one observed step. Observing the same status again is always valid,
/// and a fast job may be seen going from `PENDING` straight to a terminal
/// status between two polls.
pub fn validate_transition(from: JobStatus, to: JobStatus) -> Result<(), TransitionError> {
    if from == to || allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

/// Share of controls evaluated, as a whole percentage in `0..=100`.
pub fn progress_percent(progress: u32, total_controls: u32) -> u32 {
    if total_controls == 0 {
        return 0;
    }
    let done = u64::from(progress.min(total_controls));
    (done * 100 / u64::from(total_controls)) as u32
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn any_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Pending),
            Just(JobStatus::Running),
            Just(JobStatus::Succeeded),
            Just(JobStatus::Failed),
            Just(JobStatus::Cancelled),
        ]
    }

    #[test]
    fn wire_form_is_upper_case() {
        let status: JobStatus = serde_json::from_str("\"SUCCEEDED\"").unwrap();
        assert_eq!(status, JobStatus::Succeeded);
        assert_eq!(serde_json::to_string(&JobStatus::Cancelled).unwrap(), "\"CANCELLED\"");
    }

    #[test]
    fn unknown_status_reads_as_pending() {
        let statuses: Vec<JobStatus> =
            serde_json::from_str(r#"["QUEUED", "running", 3]"#).unwrap();
        assert_eq!(
            statuses,
            vec![JobStatus::Pending, JobStatus::Running, JobStatus::Pending]
        );
    }

    #[test]
    fn live_statuses_are_not_terminal() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Succeeded.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn only_pending_and_failed_can_run() {
        assert!(JobStatus::Pending.can_run());
        assert!(JobStatus::Failed.can_run());
        assert!(!JobStatus::Running.can_run());
        assert!(!JobStatus::Succeeded.can_run());
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        assert!(validate_transition(JobStatus::Pending, JobStatus::Running).is_ok());
        assert!(validate_transition(JobStatus::Running, JobStatus::Succeeded).is_ok());
        assert!(validate_transition(JobStatus::Pending, JobStatus::Succeeded).is_ok());
        assert!(validate_transition(JobStatus::Running, JobStatus::Pending).is_err());
        assert!(validate_transition(JobStatus::Failed, JobStatus::Running).is_err());
    }

    #[test]
    fn progress_percent_is_bounded() {
        assert_eq!(progress_percent(3, 8), 37);
        assert_eq!(progress_percent(8, 8), 100);
        assert_eq!(progress_percent(12, 8), 100);
        assert_eq!(progress_percent(5, 0), 0);
    }

    proptest! {
        #[test]
        fn terminal_statuses_absorb(from in any_status(), to in any_status()) {
            if from.is_terminal() && from != to {
                prop_assert!(validate_transition(from, to).is_err());
            }
        }

        #[test]
        fn validation_agrees_with_allowed_set(from in any_status(), to in any_status()) {
            let ok = validate_transition(from, to).is_ok();
            prop_assert_eq!(ok, from == to || allowed_transitions(from).contains(&to));
        }
    }
}
