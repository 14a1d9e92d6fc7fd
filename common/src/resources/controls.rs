use crate::api::Transport;
use crate::error::ApiError;
use crate::model::{Control, ControlCategories, ControlList, ControlSummary, ScanType};
use crate::session::SessionStore;
use crate::timer::Timer;

use super::{ComplianceClient, keys};

/// Read-only access to the control reference data. Every read uses the long
/// controls staleness window.
pub struct Controls<'c, T, S, K> {
    client: &'c ComplianceClient<T, S, K>,
}

impl<'c, T: Transport, S: SessionStore, K: Timer> Controls<'c, T, S, K> {
    pub(super) fn new(client: &'c ComplianceClient<T, S, K>) -> Self {
        Self { client }
    }

    pub async fn list(&self, framework: &str, scan_type: ScanType) -> Result<ControlList, ApiError> {
        let path = format!(
            "/controls?framework={framework}&scan_type={}",
            scan_type.as_str()
        );
        self.client
            .cached(keys::controls(framework, scan_type), self.stale(), &path)
            .await
    }

    /// The configured framework's full control set.
    pub async fn catalog(&self) -> Result<ControlList, ApiError> {
        let framework = self.client.config().framework.clone();
        self.list(&framework, ScanType::Full).await
    }

    pub async fn get(&self, control_id: &str) -> Result<Control, ApiError> {
        self.client
            .cached(
                keys::control(control_id),
                self.stale(),
                &format!("/controls/{control_id}"),
            )
            .await
    }

    pub async fn categories(&self) -> Result<ControlCategories, ApiError> {
        self.client
            .cached(keys::control_categories(), self.stale(), "/controls/categories")
            .await
    }

    pub async fn summary(&self) -> Result<ControlSummary, ApiError> {
        self.client
            .cached(keys::control_summary(), self.stale(), "/controls/summary")
            .await
    }

    fn stale(&self) -> std::time::Duration {
        self.client.config().controls_stale_time
    }
}
