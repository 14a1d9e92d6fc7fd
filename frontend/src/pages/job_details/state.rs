//! Runtime state of the job details page.
//!
//! The page owns at most one live poller at a time. Its `CancelToken` is kept
//! here so that unmounting or switching jobs can stop it; `generation` tags
//! every message a poller sends, and messages from an older generation are
//! ignored.

use common::model::{ControlCatalog, EvidenceList, Gap, Job};
use common::transform::{analysis_results, AnalysisResults};
use common::CancelToken;

pub struct JobDetails {
    pub job: Option<Job>,
    pub evidence: Option<EvidenceList>,
    pub catalog: Option<ControlCatalog>,
    pub gaps: Option<Vec<Gap>>,
    /// Token of the poller currently running, if any.
    pub poll_token: Option<CancelToken>,
    pub generation: u32,
    /// One-shot polling failure; distinct from a `FAILED` job.
    pub poll_error: Option<String>,
    /// Failure of a user action (run, delete).
    pub action_error: Option<String>,
    pub busy: bool,
}

impl JobDetails {
    pub fn new() -> Self {
        Self {
            job: None,
            evidence: None,
            catalog: None,
            gaps: None,
            poll_token: None,
            generation: 0,
            poll_error: None,
            action_error: None,
            busy: false,
        }
    }

    /// Cancels the live poller. Anything it still delivers is dropped.
    pub fn stop_polling(&mut self) {
        if let Some(token) = self.poll_token.take() {
            token.cancel();
        }
    }

    /// Forget everything tied to the previous job.
    pub fn reset(&mut self) {
        self.stop_polling();
        self.job = None;
        self.evidence = None;
        self.gaps = None;
        self.poll_error = None;
        self.action_error = None;
        self.busy = false;
    }

    pub fn is_polling(&self) -> bool {
        self.poll_token.is_some()
    }

    pub fn results(&self) -> Option<AnalysisResults> {
        let job = self.job.as_ref()?;
        let evidence = self.evidence.as_ref()?;
        Some(analysis_results(job, evidence, self.catalog.as_ref()))
    }
}
