use log::info;

use crate::api::Transport;
use crate::error::ApiError;
use crate::model::{Document, EvidenceList, GapList, Job, JobList, ScanType};
use crate::requests::CreateJobRequest;
use crate::session::SessionStore;
use crate::timer::Timer;

use super::{ComplianceClient, keys};

pub struct Jobs<'c, T, S, K> {
    client: &'c ComplianceClient<T, S, K>,
}

impl<'c, T: Transport, S: SessionStore, K: Timer> Jobs<'c, T, S, K> {
    pub(super) fn new(client: &'c ComplianceClient<T, S, K>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<JobList, ApiError> {
        let stale = self.client.config().default_stale_time;
        self.client.cached(keys::jobs(), stale, "/jobs").await
    }

    pub async fn get(&self, id: &str) -> Result<Job, ApiError> {
        let stale = self.client.config().default_stale_time;
        self.client
            .cached(keys::job(id), stale, &format!("/jobs/{id}"))
            .await
    }

    /// Uncached status read used by the poller; refreshes the cached job.
    pub async fn status(&self, id: &str) -> Result<Job, ApiError> {
        self.client.refresh(keys::job(id), &format!("/jobs/{id}")).await
    }

    pub async fn create(&self, request: &CreateJobRequest) -> Result<Job, ApiError> {
        request.validate()?;
        let job: Job = self
            .client
            .api()
            .post_json("/jobs/evidence-run", request)
            .await?;
        self.client.invalidate(&keys::jobs());
        info!(
            "created {} job {} over {} documents",
            request.scan_type.as_str(),
            job.id,
            request.document_ids.len()
        );
        Ok(job)
    }

    /// Starts an analysis over every uploaded document. With no documents it
    /// fails locally and sends nothing.
    pub async fn start_analysis(
        &self,
        documents: &[Document],
        scan_type: ScanType,
    ) -> Result<Job, ApiError> {
        let request = CreateJobRequest {
            framework: self.client.config().framework.clone(),
            document_ids: documents.iter().map(|doc| doc.id.clone()).collect(),
            scan_type,
        };
        self.create(&request).await
    }

    pub async fn run(&self, id: &str) -> Result<Job, ApiError> {
        let job: Job = self
            .client
            .api()
            .post_empty(&format!("/jobs/{id}/run"))
            .await?;
        self.client.invalidate(&keys::jobs());
        self.client.invalidate(&keys::job(&job.id));
        info!("started job {}", job.id);
        Ok(job)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.api().delete(&format!("/jobs/{id}")).await?;
        self.client.invalidate(&keys::jobs());
        info!("deleted job {id}");
        Ok(())
    }

    pub async fn evidence(&self, id: &str) -> Result<EvidenceList, ApiError> {
        let stale = self.client.config().default_stale_time;
        self.client
            .cached(keys::job_evidence(id), stale, &format!("/jobs/{id}/evidence"))
            .await
    }

    /// Evidence read that bypasses the cache, used once a job has just succeeded.
    pub async fn fresh_evidence(&self, id: &str) -> Result<EvidenceList, ApiError> {
        self.client
            .refresh(keys::job_evidence(id), &format!("/jobs/{id}/evidence"))
            .await
    }

    pub async fn gaps(&self, id: &str) -> Result<GapList, ApiError> {
        let stale = self.client.config().default_stale_time;
        self.client
            .cached(keys::job_gaps(id), stale, &format!("/jobs/{id}/gaps"))
            .await
    }
}
