//! Per-resource capabilities over the compliance backend.
//!
//! `ComplianceClient` bundles the transport, session, query cache, timer and
//! configuration. Each accessor (`auth()`, `documents()`, `jobs()`,
//! `controls()`, `reports()`) borrows it and exposes that resource's reads and mutations.
//! Reads go through the cache; mutations invalidate the lists they affect so
//! the next read reflects the write.

use std::time::Duration;

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::{ApiClient, Transport};
use crate::cache::{QueryCache, QueryKey};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::session::{Session, SessionStore};
use crate::timer::Timer;

mod auth;
mod controls;
mod documents;
mod jobs;
mod reports;

pub use auth::Auth;
pub use controls::Controls;
pub use documents::Documents;
pub use jobs::Jobs;
pub use reports::Reports;

/// Cache keys, one function per cached read.
pub mod keys {
    use crate::cache::QueryKey;
    use crate::model::ScanType;

    pub fn documents() -> QueryKey {
        QueryKey::new(["documents"])
    }

    pub fn document(id: &str) -> QueryKey {
        QueryKey::new(["documents", id])
    }

    pub fn jobs() -> QueryKey {
        QueryKey::new(["jobs"])
    }

    pub fn job(id: &str) -> QueryKey {
        QueryKey::new(["jobs", id])
    }

    pub fn job_evidence(id: &str) -> QueryKey {
        QueryKey::new(["jobs", id, "evidence"])
    }

    pub fn job_gaps(id: &str) -> QueryKey {
        QueryKey::new(["jobs", id, "gaps"])
    }

    pub fn controls(framework: &str, scan_type: ScanType) -> QueryKey {
        QueryKey::new(["controls", framework, scan_type.as_str()])
    }

    pub fn control(control_id: &str) -> QueryKey {
        QueryKey::new(["controls", "by-id", control_id])
    }

    pub fn control_categories() -> QueryKey {
        QueryKey::new(["controls", "categories"])
    }

    pub fn control_summary() -> QueryKey {
        QueryKey::new(["controls", "summary"])
    }
}

pub struct ComplianceClient<T, S, K> {
    api: ApiClient<T, S>,
    cache: QueryCache,
    timer: K,
}

impl<T: Transport, S: SessionStore, K: Timer> ComplianceClient<T, S, K> {
    pub fn new(transport: T, store: S, timer: K, config: ApiConfig) -> Self {
        Self {
            api: ApiClient::new(transport, Session::new(store), config),
            cache: QueryCache::new(),
            timer,
        }
    }

    pub fn api(&self) -> &ApiClient<T, S> {
        &self.api
    }

    pub fn session(&self) -> &Session<S> {
        self.api.session()
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn timer(&self) -> &K {
        &self.timer
    }

    pub fn config(&self) -> &ApiConfig {
        self.api.config()
    }

    pub fn auth(&self) -> Auth<'_, T, S, K> {
        Auth::new(self)
    }

    pub fn documents(&self) -> Documents<'_, T, S, K> {
        Documents::new(self)
    }

    pub fn jobs(&self) -> Jobs<'_, T, S, K> {
        Jobs::new(self)
    }

    pub fn controls(&self) -> Controls<'_, T, S, K> {
        Controls::new(self)
    }

    pub fn reports(&self) -> Reports<'_, T, S, K> {
        Reports::new(self)
    }

    /// Serves `key` from the cache while fresh, otherwise fetches `path`.
    pub(crate) async fn cached<R>(
        &self,
        key: QueryKey,
        stale_time: Duration,
        path: &str,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned + Serialize,
    {
        if let Some(hit) = self.cache.get_fresh(&key, self.timer.now(), stale_time) {
            debug!("cache hit {key}");
            return Ok(hit);
        }
        self.refresh(key, path).await
    }

    /// Always fetches `path` and writes the result back under `key`.
    pub(crate) async fn refresh<R>(&self, key: QueryKey, path: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned + Serialize,
    {
        let generation = self.cache.generation();
        let value: R = self.api.get(path).await?;
        self.cache
            .insert_if_current(key, &value, self.timer.now(), generation);
        Ok(value)
    }

    pub(crate) fn invalidate(&self, key: &QueryKey) {
        self.cache.invalidate(key);
    }
}
