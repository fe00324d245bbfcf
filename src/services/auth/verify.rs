/*
 * Responsibility
 * - Verify service and client access tokens through the verify endpoints
 * - Memoize verdicts in the cache under `token + bearer`:
 *   - valid: payload JSON, TTL = exp - now (never outlives the token)
 *   - invalid: NEGATIVE_VERDICT, default TTL
 *
 * NOTE:
 * - "Invalid" is `Ok(None)`, never an error. Errors are transport/config failures.
 * - A service token whose `sub` differs from the challenged service is treated as
 *   invalid and logged at error level (possible token misuse).
 */
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::dto::responses::VerifyResponse;
use crate::error::RequestError;
use crate::routes::{PostRequest, authentication, users};
use crate::services::auth::payload::{
    ClientAccessTokenPayload, ServiceAccessTokenPayload, TokenBearer, mask_token, now_unix,
};
use crate::services::request::client::ServiceClient;
use crate::services::request::executor::BoxFuture;
use crate::services::request::options::RequestOptions;
use crate::services::request::response::ResponseBody;
use crate::services::service::Service;

/// Cached marker for a token known to be invalid.
pub const NEGATIVE_VERDICT: &[u8] = b"false";

pub fn verification_cache_key(token: &str, bearer: TokenBearer) -> String {
    format!("{}{}", token, bearer.as_str())
}

enum Cached<P> {
    Valid(P),
    Invalid,
    Miss,
}

impl ServiceClient {
    /// Payload of a valid service token; `None` when the token is invalid or
    /// belongs to a different service than `expected`.
    pub fn verify_service_token<'a>(
        &'a self,
        token: &'a str,
        expected: Option<Service>,
    ) -> BoxFuture<'a, Result<Option<ServiceAccessTokenPayload>, RequestError>> {
        Box::pin(async move {
            let key = verification_cache_key(token, TokenBearer::Service);
            let masked = mask_token(token, 4);

            match self.cached_verdict::<ServiceAccessTokenPayload>(&key).await {
                Cached::Valid(payload) => {
                    if let Some(expected) = expected.filter(|s| *s != payload.sub) {
                        error!(
                            service = %expected,
                            sub = %payload.sub,
                            token = %masked,
                            "service presented someone else's token"
                        );
                        return Ok(None);
                    }
                    return Ok(Some(payload));
                }
                Cached::Invalid => {
                    warn!(service = ?expected, token = %masked, "service has an invalid token (cached)");
                    return Ok(None);
                }
                Cached::Miss => {}
            }

            let request = authentication::service_jwt_verify(token)?;
            let Some(payload) = self.remote_verdict(&key, request).await? else {
                warn!(service = ?expected, token = %masked, "service has an invalid token");
                return Ok(None);
            };

            if let Some(expected) = expected.filter(|s| *s != payload.sub) {
                self.inner.cache.set(&key, NEGATIVE_VERDICT, None).await;
                error!(
                    service = %expected,
                    sub = %payload.sub,
                    token = %masked,
                    "service presented someone else's token"
                );
                return Ok(None);
            }

            self.cache_payload(&key, &payload, payload.exp).await;
            info!(service = %payload.sub, "the service token is valid");
            Ok(Some(payload))
        })
    }

    /// Payload of a valid client token; `None` when the token is invalid.
    pub fn verify_client_token<'a>(
        &'a self,
        token: &'a str,
    ) -> BoxFuture<'a, Result<Option<ClientAccessTokenPayload>, RequestError>> {
        Box::pin(async move {
            let key = verification_cache_key(token, TokenBearer::Client);

            match self.cached_verdict::<ClientAccessTokenPayload>(&key).await {
                Cached::Valid(payload) => return Ok(Some(payload)),
                Cached::Invalid => {
                    info!("client has an invalid token (cached)");
                    return Ok(None);
                }
                Cached::Miss => {}
            }

            let request = match self.inner.config.client_verify_service {
                Service::Users => users::verify_user(token)?,
                _ => authentication::client_jwt_verify(token)?,
            };
            let Some(payload) = self.remote_verdict(&key, request).await? else {
                info!("client has an invalid token");
                return Ok(None);
            };

            self.cache_payload(&key, &payload, payload.exp).await;
            info!(user = %payload.sub, "the client token is valid");
            Ok(Some(payload))
        })
    }

    async fn cached_verdict<P: DeserializeOwned>(&self, key: &str) -> Cached<P> {
        let Some(bytes) = self.inner.cache.get(key).await else {
            return Cached::Miss;
        };
        if bytes == NEGATIVE_VERDICT {
            return Cached::Invalid;
        }
        match serde_json::from_slice(&bytes) {
            Ok(payload) => Cached::Valid(payload),
            Err(e) => {
                warn!(error = %e, "unreadable cached verification, verifying again");
                Cached::Miss
            }
        }
    }

    /// Ask the verify endpoint. Only a verdict on the token itself is negatively
    /// cached; a 4xx or 5xx answer to the verify call is not.
    async fn remote_verdict<P>(
        &self,
        key: &str,
        request: PostRequest<VerifyResponse<P>>,
    ) -> Result<Option<P>, RequestError>
    where
        P: DeserializeOwned + Serialize + VerifiablePayload,
    {
        let response = self.post(request, RequestOptions::new()).await?;
        let verdict = match response.body {
            ResponseBody::Success(VerifyResponse {
                is_verify: true,
                payload: Some(payload),
                ..
            }) if payload.claims_consistent() => Some(payload),
            ResponseBody::Success(_) => None,
            // the endpoint refused this call; nothing is known about the token
            ResponseBody::ClientError(body) => {
                warn!(
                    status = response.status_code,
                    detail = ?body.detail,
                    "verify endpoint rejected the call"
                );
                return Ok(None);
            }
            ResponseBody::ServerError(body) => {
                warn!(status = response.status_code, error = %body.error, "verify endpoint failed");
                return Ok(None);
            }
        };
        if verdict.is_none() {
            self.inner.cache.set(key, NEGATIVE_VERDICT, None).await;
        }
        Ok(verdict)
    }

    async fn cache_payload<P: Serialize>(&self, key: &str, payload: &P, exp: i64) {
        let remaining = exp - now_unix();
        if remaining <= 0 {
            debug!("token expires now, verdict not cached");
            return;
        }
        match serde_json::to_vec(payload) {
            Ok(bytes) => {
                self.inner
                    .cache
                    .set(key, &bytes, Some(Duration::from_secs(remaining as u64)))
                    .await
            }
            Err(e) => warn!(error = %e, "failed to encode verified payload"),
        }
    }
}

/// Claim checks applied to a payload returned as verified.
pub(crate) trait VerifiablePayload {
    fn claims_consistent(&self) -> bool;
}

impl VerifiablePayload for ServiceAccessTokenPayload {
    fn claims_consistent(&self) -> bool {
        self.is_well_formed()
    }
}

impl VerifiablePayload for ClientAccessTokenPayload {
    fn claims_consistent(&self) -> bool {
        self.is_well_formed()
    }
}
