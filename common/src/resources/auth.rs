use log::{info, warn};

use crate::api::Transport;
use crate::error::ApiError;
use crate::model::{Token, User};
use crate::requests::{LoginRequest, RegisterRequest};
use crate::session::SessionStore;
use crate::timer::Timer;

use super::ComplianceClient;

pub struct Auth<'c, T, S, K> {
    client: &'c ComplianceClient<T, S, K>,
}

impl<'c, T: Transport, S: SessionStore, K: Timer> Auth<'c, T, S, K> {
    pub(super) fn new(client: &'c ComplianceClient<T, S, K>) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a token, stores it, then loads and stores the
    /// profile. If the profile cannot be loaded the fresh token is dropped again
    /// so the session never ends up half signed in.
    pub async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
        request.validate()?;
        let token: Token = self
            .client
            .api()
            .post_form("/auth/login", request.form_fields())
            .await?;
        let session = self.client.session();
        session.store_token(&token.access_token);

        match self.me().await {
            Ok(user) => {
                session.store_user(&user);
                info!("signed in as {}", user.email);
                Ok(user)
            }
            Err(err) => {
                warn!("profile fetch after login failed: {err}");
                session.clear();
                Err(err)
            }
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        request.validate()?;
        self.client.api().post_json("/auth/register", request).await
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.api().get("/auth/me").await
    }

    /// Clears token and user and drops every cached read, so nothing fetched
    /// under the old identity is shown to the next one.
    pub fn logout(&self) {
        self.client.session().clear();
        self.client.cache().clear();
        info!("signed out");
    }
}
