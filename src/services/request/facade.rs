/*
 * Responsibility
 * - GET / POST entry points over the executor
 * - GET: read-through response cache keyed by URL
 * - POST: opt-in cache for GraphQL calls keyed by URL + body, unrequested fields stripped
 *
 * NOTE:
 * - Cache hits skip the executor entirely (including responder verification);
 *   the entry's TTL bounds staleness.
 * - Only non-error responses are cached.
 */
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::dto::requests::PostData;
use crate::error::RequestError;
use crate::graphql::compact;
use crate::routes::{GetRequest, PostRequest};
use crate::services::request::client::ServiceClient;
use crate::services::request::executor::{Call, CallMode, Method};
use crate::services::request::options::RequestOptions;
use crate::services::request::response::{CachedResponse, RawResponse, Response, ResponseBody};
use crate::services::service::Service;

impl ServiceClient {
    pub async fn get<T: DeserializeOwned>(
        &self,
        request: GetRequest<T>,
        options: RequestOptions,
    ) -> Result<Response<T>, RequestError> {
        self.send_get(request.service, &request.path, &options).await
    }

    pub async fn post<T: DeserializeOwned + Serialize>(
        &self,
        request: PostRequest<T>,
        options: RequestOptions,
    ) -> Result<Response<T>, RequestError> {
        self.send_post(
            request.service,
            &request.path,
            &request.post_data,
            request.is_graphql,
            &options,
        )
        .await
    }

    pub async fn send_get<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Response<T>, RequestError> {
        self.resolve(service, options)?;
        let use_cache = options.use_cache.unwrap_or(self.inner.config.use_get_cache);
        let url = self.url(
            service,
            path,
            options.host.as_deref(),
            options.protocol.as_deref(),
        );

        if use_cache {
            if let Some(response) = self.cached_response(&url).await {
                return Ok(response);
            }
        }

        let raw = self
            .execute(Call {
                service,
                path,
                method: Method::Get,
                body: &PostData::Empty,
                options,
                mode: CallMode::Regular,
            })
            .await?;

        if use_cache && !raw.is_error() {
            self.store_raw(&url, &raw, options).await;
        }
        raw.classify(service)
    }

    pub async fn send_post<T: DeserializeOwned + Serialize>(
        &self,
        service: Service,
        path: &str,
        post_data: &PostData,
        is_graphql: bool,
        options: &RequestOptions,
    ) -> Result<Response<T>, RequestError> {
        self.send_post_as(service, path, post_data, is_graphql, options, CallMode::Regular)
            .await
    }

    pub(crate) async fn send_post_as<T: DeserializeOwned + Serialize>(
        &self,
        service: Service,
        path: &str,
        post_data: &PostData,
        is_graphql: bool,
        options: &RequestOptions,
        mode: CallMode,
    ) -> Result<Response<T>, RequestError> {
        self.resolve(service, options)?;
        let use_cache =
            is_graphql && options.use_cache.unwrap_or(self.inner.config.use_graphql_cache);
        let cache_key = use_cache.then(|| {
            let url = self.url(
                service,
                path,
                options.host.as_deref(),
                options.protocol.as_deref(),
            );
            format!("{}{}", url, post_data.cache_fragment())
        });

        if let Some(key) = &cache_key {
            if let Some(response) = self.cached_response(key).await {
                return Ok(response);
            }
        }

        let raw = self
            .execute(Call {
                service,
                path,
                method: Method::Post,
                body: post_data,
                options,
                mode,
            })
            .await?;
        let response: Response<T> = raw.classify(service)?;

        if let (Some(key), ResponseBody::Success(body)) = (&cache_key, &response.body) {
            match compact(body) {
                Ok(body) => {
                    let cached = CachedResponse {
                        status_code: response.status_code,
                        headers: response.headers.clone(),
                        body,
                    };
                    self.store(key, &cached, options).await;
                }
                Err(e) => warn!(error = %e, "failed to compact graphql body for cache"),
            }
        }
        Ok(response)
    }

    async fn cached_response<T: DeserializeOwned>(&self, key: &str) -> Option<Response<T>> {
        let bytes = self.inner.cache.get(key).await?;
        let decoded = serde_json::from_slice::<CachedResponse>(&bytes)
            .and_then(CachedResponse::into_response);
        match decoded {
            Ok(response) => {
                debug!(key = %key, "response cache hit");
                Some(response)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "unreadable cached response, ignoring");
                None
            }
        }
    }

    async fn store_raw(&self, key: &str, raw: &RawResponse, options: &RequestOptions) {
        match serde_json::from_str(&raw.text) {
            Ok(body) => {
                let cached = CachedResponse {
                    status_code: raw.status_code,
                    headers: raw.headers.clone(),
                    body,
                };
                self.store(key, &cached, options).await;
            }
            Err(e) => warn!(key = %key, error = %e, "response body is not json, not cached"),
        }
    }

    async fn store(&self, key: &str, cached: &CachedResponse, options: &RequestOptions) {
        match serde_json::to_vec(cached) {
            Ok(bytes) => self.inner.cache.set(key, &bytes, options.cache_ttl).await,
            Err(e) => warn!(key = %key, error = %e, "failed to encode cached response"),
        }
    }
}
