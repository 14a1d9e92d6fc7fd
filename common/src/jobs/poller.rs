use std::time::Duration;

use log::{debug, info, warn};

use crate::api::Transport;
use crate::error::ApiError;
use crate::model::{EvidenceList, Job};
use crate::resources::ComplianceClient;
use crate::session::SessionStore;
use crate::timer::{CancelToken, Timer};

use super::{JobStatus, validate_transition};

#[derive(Debug, Clone, PartialEq)]
pub enum PollUpdate {
    Status(Job),
    /// Delivered once, right after `SUCCEEDED` is observed.
    Evidence(EvidenceList),
    Error(ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Finished(JobStatus),
    Cancelled,
    Errored,
}

/// Follows one job until it reaches a terminal status.
///
/// Status fetches are strictly sequential: the next one is issued only after
/// the previous response arrived and the interval elapsed. Cancelling the
/// token stops future polls; a response that lands after cancellation is
/// dropped without being delivered.
pub struct JobPoller<'c, T, S, K> {
    client: &'c ComplianceClient<T, S, K>,
    job_id: String,
    interval: Duration,
    token: CancelToken,
}

impl<'c, T: Transport, S: SessionStore, K: Timer> JobPoller<'c, T, S, K> {
    pub fn new(client: &'c ComplianceClient<T, S, K>, job_id: impl Into<String>) -> Self {
        Self {
            client,
            job_id: job_id.into(),
            interval: client.config().poll_interval,
            token: CancelToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.token = token;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub async fn run(self, mut on_update: impl FnMut(PollUpdate)) -> PollOutcome {
        let jobs = self.client.jobs();
        let mut last: Option<JobStatus> = None;

        loop {
            if self.token.is_cancelled() {
                debug!("polling {} cancelled", self.job_id);
                return PollOutcome::Cancelled;
            }

            let result = jobs.status(&self.job_id).await;
            if self.token.is_cancelled() {
                debug!("dropping status of {} after cancel", self.job_id);
                return PollOutcome::Cancelled;
            }

            let job = match result {
                Ok(job) => job,
                Err(err) => {
                    warn!("polling {} failed: {err}", self.job_id);
                    on_update(PollUpdate::Error(err));
                    return PollOutcome::Errored;
                }
            };

            let status = job.status;
            if let Some(previous) = last {
                if let Err(err) = validate_transition(previous, status) {
                    warn!("job {}: {err}", self.job_id);
                }
            }
            last = Some(status);
            on_update(PollUpdate::Status(job));

            if status.is_terminal() {
                info!("job {} finished as {}", self.job_id, status.as_str());
                if status == JobStatus::Succeeded {
                    let evidence = jobs.fresh_evidence(&self.job_id).await;
                    if self.token.is_cancelled() {
                        return PollOutcome::Cancelled;
                    }
                    match evidence {
                        Ok(list) => on_update(PollUpdate::Evidence(list)),
                        Err(err) => on_update(PollUpdate::Error(err)),
                    }
                }
                return PollOutcome::Finished(status);
            }

            self.client.timer().sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::Method;
    use crate::config::ApiConfig;
    use crate::session::MemoryStore;
    use crate::test_harness::MockTransport;
    use crate::timer::ManualTimer;

    fn job(status: &str) -> serde_json::Value {
        json!({
            "id": "j-1",
            "job_type": "evidence_run",
            "status": status,
            "progress": 0,
            "total_controls": 8
        })
    }

    #[test]
    fn cancelled_before_start_sends_nothing() {
        let transport = MockTransport::new();
        let client = ComplianceClient::new(
            transport.clone(),
            MemoryStore::new(),
            ManualTimer::new(),
            ApiConfig::default(),
        );
        let poller = JobPoller::new(&client, "j-1");
        poller.cancel_token().cancel();

        let outcome = futures::executor::block_on(poller.run(|_| {}));
        assert_eq!(outcome, PollOutcome::Cancelled);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn failed_job_stops_without_evidence() {
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/jobs/j-1", 200, job("RUNNING"));
        transport.respond(Method::Get, "/jobs/j-1", 200, job("FAILED"));
        let client = ComplianceClient::new(
            transport.clone(),
            MemoryStore::new(),
            ManualTimer::new(),
            ApiConfig::default(),
        );

        let mut updates = Vec::new();
        let outcome = futures::executor::block_on(
            JobPoller::new(&client, "j-1").run(|update| updates.push(update)),
        );

        assert_eq!(outcome, PollOutcome::Finished(JobStatus::Failed));
        assert_eq!(updates.len(), 2);
        assert_eq!(transport.count(Method::Get, "/jobs/j-1/evidence"), 0);
    }
}
