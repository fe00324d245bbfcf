/*
 * Responsibility
 * - Obtain the service's own token pair (login) and keep it fresh (refresh-token exchange)
 * - Background refresh loop
 *
 * NOTE:
 * - Login and refresh are single-flight: they run under `refresh_lock`, and a caller
 *   that observed an older token generation skips the network call when someone else
 *   already stored a newer pair.
 * - `*_while_locked` functions assume the caller holds `refresh_lock`.
 */
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::dto::responses::{ClientErrorBody, TokensSet};
use crate::error::RequestError;
use crate::routes::authentication;
use crate::services::request::client::ServiceClient;
use crate::services::request::executor::CallMode;
use crate::services::request::options::RequestOptions;
use crate::services::request::response::{Response, ResponseBody};

impl ServiceClient {
    /// Exchange login + password for a fresh token pair.
    ///
    /// A non-success answer is fatal: the service cannot establish its identity.
    pub async fn get_tokens_by_login(&self) -> Result<(), RequestError> {
        let _guard = self.inner.refresh_lock.lock().await;
        self.login_while_locked().await
    }

    /// Refresh-token exchange, falling back to login when it is rejected.
    pub async fn get_tokens(&self) -> Result<(), RequestError> {
        let _guard = self.inner.refresh_lock.lock().await;
        self.refresh_while_locked().await
    }

    /// Refresh unless the pair changed since `observed_generation`.
    pub(crate) async fn refresh_if_stale(&self, observed_generation: u64) -> Result<(), RequestError> {
        let _guard = self.inner.refresh_lock.lock().await;
        if self.token_generation() != observed_generation {
            info!("tokens were refreshed concurrently, reusing them");
            return Ok(());
        }
        self.refresh_while_locked().await
    }

    /// Current access token, logging in first when there is none yet.
    pub async fn ensure_access_token(&self) -> Result<String, RequestError> {
        self.ensure_access_token_with_generation()
            .await
            .map(|(token, _)| token)
    }

    /// Access token together with the generation of the pair it belongs to.
    pub(crate) async fn ensure_access_token_with_generation(
        &self,
    ) -> Result<(String, u64), RequestError> {
        if let Some(current) = self.current_access_token().await {
            return Ok(current);
        }
        let _guard = self.inner.refresh_lock.lock().await;
        if let Some(current) = self.current_access_token().await {
            return Ok(current);
        }
        self.login_while_locked().await?;
        self.current_access_token()
            .await
            .ok_or_else(|| RequestError::Config("login did not store an access token".into()))
    }

    pub(crate) async fn login_while_locked(&self) -> Result<(), RequestError> {
        let config = &self.inner.config;
        let request = authentication::service_jwt_create(&config.login, &config.password)?;
        let response: Response<TokensSet> = self
            .send_post_as(
                request.service,
                &request.path,
                &request.post_data,
                false,
                &RequestOptions::new().without_auth(),
                CallMode::Lifecycle,
            )
            .await?;

        match response.body {
            ResponseBody::Success(tokens) => {
                self.set_tokens(tokens).await;
                info!("tokens have been received by login");
                Ok(())
            }
            ResponseBody::ClientError(body) => {
                error!(status = response.status_code, "failed to get tokens by login");
                Err(RequestError::Credentials {
                    status: response.status_code,
                    detail: describe(&body),
                })
            }
            ResponseBody::ServerError(body) => {
                error!(status = response.status_code, "failed to get tokens by login");
                Err(RequestError::Credentials {
                    status: response.status_code,
                    detail: body.error,
                })
            }
        }
    }

    async fn refresh_while_locked(&self) -> Result<(), RequestError> {
        let Some(refresh_token) = self.refresh_token().await else {
            return self.login_while_locked().await;
        };

        let request = authentication::service_jwt_update(&refresh_token)?;
        let response: Response<TokensSet> = self
            .send_post_as(
                request.service,
                &request.path,
                &request.post_data,
                false,
                &RequestOptions::new(),
                CallMode::Lifecycle,
            )
            .await?;

        match response.into_success() {
            Some(tokens) => {
                self.set_tokens(tokens).await;
                info!("tokens have been refreshed");
                Ok(())
            }
            None => {
                warn!("refresh token rejected, logging in again");
                self.login_while_locked().await
            }
        }
    }

    /// Refresh the token pair every `interval` for the lifetime of the process.
    ///
    /// The first iteration runs immediately. A failed iteration is logged and the
    /// loop carries on with the next sleep.
    pub fn spawn_token_refresh_task(&self, interval: Option<Duration>) -> JoinHandle<()> {
        let client = self.clone();
        let interval = interval.unwrap_or(self.inner.config.token_refresh_interval);
        info!(interval_secs = interval.as_secs(), "token refresh task started");
        tokio::spawn(async move {
            loop {
                if let Err(e) = client.get_tokens().await {
                    error!(error = %e, "token refresh iteration failed");
                }
                tokio::time::sleep(interval).await;
            }
        })
    }
}

fn describe(body: &ClientErrorBody) -> String {
    serde_json::to_string(&body.detail).unwrap_or_else(|_| format!("{:?}", body.detail))
}
