/*
 * Responsibility
 * - Perform one logical request: guards, header assembly, bounded retry
 * - Responder identity check (the answering service must present its own valid token)
 * - Expired/invalid JWT status: refresh tokens once and replay the whole request
 *
 * NOTE:
 * - Argument and configuration errors are raised before any I/O.
 * - Connect failures/timeouts and failed responder checks consume the retry budget;
 *   the replay after a refresh does not.
 */
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::dto::requests::PostData;
use crate::error::RequestError;
use crate::services::auth::payload::mask_token;
use crate::services::request::client::ServiceClient;
use crate::services::request::headers::{
    REQUEST_ID, ensure_unique_values, extract_token_from_header, format_auth_header, merge_headers,
};
use crate::services::request::options::RequestOptions;
use crate::services::request::response::RawResponse;
use crate::services::service::Service;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// How a call relates to the token lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallMode {
    /// Regular call: may log in on demand and replays once on an expired token.
    Regular,
    /// Replay after a refresh: never refreshes again.
    Replay,
    /// Login/refresh exchange made while the refresh lock is held.
    Lifecycle,
}

pub(crate) struct Call<'a> {
    pub service: Service,
    pub path: &'a str,
    pub method: Method,
    pub body: &'a PostData,
    pub options: &'a RequestOptions,
    pub mode: CallMode,
}

/// Options resolved against the client defaults.
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    pub timeout: Duration,
    pub timeout_secs: f64,
    pub max_reconnections: u32,
    pub use_auth_token: bool,
}

impl ServiceClient {
    /// Synchronous guards shared by the façade and the executor.
    pub(crate) fn resolve(
        &self,
        service: Service,
        options: &RequestOptions,
    ) -> Result<Resolved, RequestError> {
        let config = &self.inner.config;
        if service == config.self_service {
            error!(service = %service, "services cannot make requests to themselves");
            return Err(RequestError::SelfRequest(service));
        }

        let timeout_secs = options.timeout_secs.unwrap_or(config.default_timeout_secs);
        if !(timeout_secs >= 0.0) {
            return Err(RequestError::invalid_argument(
                "the timeout cannot be less than 0",
            ));
        }
        let timeout = Duration::try_from_secs_f64(timeout_secs)
            .map_err(|_| RequestError::invalid_argument("the timeout is out of range"))?;

        let max_reconnections = options
            .max_reconnections
            .unwrap_or(config.default_max_reconnections);
        if max_reconnections < 2 {
            return Err(RequestError::invalid_argument(
                "the max_reconnections cannot be less than 2",
            ));
        }

        Ok(Resolved {
            timeout,
            timeout_secs,
            max_reconnections,
            use_auth_token: options
                .use_auth_token
                .unwrap_or(config.default_use_auth_token),
        })
    }

    fn auth_header_format<'a>(&'a self, options: &'a RequestOptions) -> &'a str {
        options
            .auth_header_format
            .as_deref()
            .unwrap_or(&self.inner.config.auth_header_format)
    }

    /// Access token for the call and the generation of the pair it came from.
    async fn token_for(&self, mode: CallMode) -> Result<(String, u64), RequestError> {
        match mode {
            CallMode::Lifecycle => {
                if let Some(current) = self.current_access_token().await {
                    return Ok(current);
                }
                self.login_while_locked().await?;
                self.current_access_token()
                    .await
                    .ok_or_else(|| RequestError::Config("login did not store an access token".into()))
            }
            CallMode::Regular | CallMode::Replay => {
                self.ensure_access_token_with_generation().await
            }
        }
    }

    /// Headers of the call, plus the token generation a stale-token answer refers to.
    async fn build_headers(
        &self,
        call: &Call<'_>,
        resolved: &Resolved,
    ) -> Result<(HashMap<String, String>, u64), RequestError> {
        if let Some(headers) = &call.options.headers {
            ensure_unique_values(headers)?;
            return Ok((headers.clone(), self.token_generation()));
        }

        let (authorization, generation) = if resolved.use_auth_token {
            let (token, generation) = self.token_for(call.mode).await?;
            let header = format_auth_header(self.auth_header_format(call.options), &token);
            (Some(header), generation)
        } else {
            (None, self.token_generation())
        };

        let mut headers = merge_headers(
            &self.inner.config.default_headers,
            &call.options.add_headers,
            authorization,
        );
        ensure_unique_values(&headers).inspect_err(|e| {
            error!(service = %call.service, error = %e, "duplicate header values");
        })?;
        headers.insert(REQUEST_ID.to_string(), Uuid::new_v4().to_string());
        Ok((headers, generation))
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        headers: &HashMap<String, String>,
        body: &PostData,
        timeout: Duration,
    ) -> Result<RawResponse, reqwest::Error> {
        let mut builder = match method {
            Method::Get => self.inner.http.get(url),
            Method::Post => self.inner.http.post(url),
        };
        builder = builder.timeout(timeout);
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if method == Method::Post {
            builder = body.apply(builder);
        }

        let response = builder.send().await?;
        let status_code = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let text = response.text().await?;
        Ok(RawResponse {
            status_code,
            headers,
            text,
        })
    }

    /// Confirm the responder presented a valid token naming `service`.
    async fn responder_is_trusted(
        &self,
        service: Service,
        raw: &RawResponse,
        header_format: &str,
    ) -> Result<bool, RequestError> {
        let Some(header) = raw.header("Authorization") else {
            warn!(service = %service, "service does not have an authorization header");
            return Ok(false);
        };
        let token = extract_token_from_header(header, header_format);
        match self.verify_service_token(&token, Some(service)).await {
            Ok(Some(_)) => Ok(true),
            Ok(None) => {
                warn!(
                    service = %service,
                    token = %mask_token(&token, 4),
                    "service has an invalid token"
                );
                Ok(false)
            }
            Err(e) if e.is_fatal_config() => Err(e),
            Err(e) => {
                warn!(service = %service, error = %e, "responder verification failed");
                Ok(false)
            }
        }
    }

    pub(crate) fn execute<'a>(
        &'a self,
        call: Call<'a>,
    ) -> BoxFuture<'a, Result<RawResponse, RequestError>> {
        Box::pin(async move {
            let resolved = self.resolve(call.service, call.options)?;
            let url = self.url(
                call.service,
                call.path,
                call.options.host.as_deref(),
                call.options.protocol.as_deref(),
            );

            // generation of the token actually sent; a refresh racing this call is detected
            let (headers, observed_generation) = self.build_headers(&call, &resolved).await?;
            let header_format = self.auth_header_format(call.options).to_string();

            let mut answered = None;
            for attempt in 1..=resolved.max_reconnections {
                let raw = match self
                    .send_once(call.method, &url, &headers, call.body, resolved.timeout)
                    .await
                {
                    Ok(raw) => raw,
                    Err(e) if is_transient(&e) => {
                        warn!(
                            service = %call.service,
                            attempt,
                            error = %e,
                            "service did not respond"
                        );
                        continue;
                    }
                    Err(e) => {
                        error!(service = %call.service, error = %e, "transport error");
                        return Err(RequestError::Transport {
                            service: call.service,
                            message: e.to_string(),
                        });
                    }
                };

                if call.service == Service::Authentication || raw.is_error() {
                    answered = Some(raw);
                    break;
                }
                if self
                    .responder_is_trusted(call.service, &raw, &header_format)
                    .await?
                {
                    answered = Some(raw);
                    break;
                }
                debug!(service = %call.service, attempt, "retrying after failed responder check");
            }

            let Some(raw) = answered else {
                let err = RequestError::Connection {
                    service: call.service,
                    attempts: resolved.max_reconnections,
                    timeout_secs: resolved.timeout_secs,
                };
                error!(error = %err, "reconnection budget exhausted");
                return Err(err);
            };

            let config = &self.inner.config;
            let stale_token = raw.status_code == config.jwt_expired_status
                || raw.status_code == config.jwt_invalid_status;
            if stale_token && call.mode == CallMode::Regular {
                info!(
                    service = %call.service,
                    status = raw.status_code,
                    "jwt rejected, refreshing tokens and replaying"
                );
                self.refresh_if_stale(observed_generation).await?;
                return self
                    .execute(Call {
                        mode: CallMode::Replay,
                        ..call
                    })
                    .await;
            }

            info!(
                method = call.method.as_str(),
                url = %url,
                status = raw.status_code,
                "request completed"
            );
            Ok(raw)
        })
    }
}

/// Faults of the exchange itself (connect, timeout, dropped connection, broken body).
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout() || e.is_request() || e.is_body()
}
