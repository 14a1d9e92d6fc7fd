use log::info;

use crate::api::Transport;
use crate::error::ApiError;
use crate::model::{Document, DocumentList};
use crate::requests::UploadFile;
use crate::session::SessionStore;
use crate::timer::Timer;

use super::{ComplianceClient, keys};

pub struct Documents<'c, T, S, K> {
    client: &'c ComplianceClient<T, S, K>,
}

impl<'c, T: Transport, S: SessionStore, K: Timer> Documents<'c, T, S, K> {
    pub(super) fn new(client: &'c ComplianceClient<T, S, K>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<DocumentList, ApiError> {
        let stale = self.client.config().default_stale_time;
        self.client.cached(keys::documents(), stale, "/documents").await
    }

    pub async fn get(&self, id: &str) -> Result<Document, ApiError> {
        let stale = self.client.config().default_stale_time;
        self.client
            .cached(keys::document(id), stale, &format!("/documents/{id}"))
            .await
    }

    /// Validates locally, then uploads as multipart. The document list is
    /// invalidated on success.
    pub async fn upload(&self, file: UploadFile) -> Result<Document, ApiError> {
        file.validate()?;
        let name = file.file_name.clone();
        let document: Document = self
            .client
            .api()
            .post_multipart("/documents/upload", file)
            .await?;
        self.client.invalidate(&keys::documents());
        info!("uploaded {name} as {}", document.id);
        Ok(document)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.api().delete(&format!("/documents/{id}")).await?;
        self.client.invalidate(&keys::documents());
        info!("deleted document {id}");
        Ok(())
    }
}
