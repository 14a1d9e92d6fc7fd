use crate::api::{Transport, encode_query_value};
use crate::error::ApiError;
use crate::session::SessionStore;
use crate::timer::Timer;

use super::ComplianceClient;

/// PDF report downloads. Reports are generated per request and never cached.
pub struct Reports<'c, T, S, K> {
    client: &'c ComplianceClient<T, S, K>,
}

impl<'c, T: Transport, S: SessionStore, K: Timer> Reports<'c, T, S, K> {
    pub(super) fn new(client: &'c ComplianceClient<T, S, K>) -> Self {
        Self { client }
    }

    /// The sample report for the demo tour. Needs no session.
    pub async fn demo(&self, organization: &str) -> Result<Vec<u8>, ApiError> {
        let path = format!(
            "/reports/demo?organization_name={}",
            encode_query_value(organization)
        );
        self.client.api().get_bytes(&path).await
    }
}
