/*
 * Responsibility
 * - ServiceClient: the self-service handle shared by every request of a process
 * - Owns the HTTP client, the response/verification cache and the token pair
 *
 * NOTE:
 * - Cloning is cheap (Arc); all clones share one token state.
 * - Token guards are never held across an await.
 */
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

use crate::config::ClientConfig;
use crate::dto::responses::TokensSet;
use crate::error::RequestError;
use crate::services::cache::{CacheClient, TtlCache};
use crate::services::service::Service;

#[derive(Default)]
pub(crate) struct TokenState {
    pub(crate) access: Option<String>,
    pub(crate) refresh: Option<String>,
}

pub(crate) struct ClientInner {
    pub(crate) config: ClientConfig,
    pub(crate) http: reqwest::Client,
    pub(crate) cache: TtlCache,
    pub(crate) tokens: RwLock<TokenState>,
    // serializes login / refresh
    pub(crate) refresh_lock: Mutex<()>,
    // bumped on every token pair stored
    pub(crate) generation: AtomicU64,
}

#[derive(Clone)]
pub struct ServiceClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("config", &self.inner.config)
            .field("cache", &self.inner.cache)
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    pub fn new(config: ClientConfig, cache: Arc<dyn CacheClient>) -> Result<Self, RequestError> {
        if config.external_services.contains(&config.self_service) {
            error!(
                service = %config.self_service,
                "current service is in the list of external services"
            );
            return Err(RequestError::SelfRequest(config.self_service));
        }
        config
            .validate()
            .map_err(|e| RequestError::Config(e.to_string()))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RequestError::Config(format!("http client: {}", e)))?;
        let cache = TtlCache::with_default_ttl(cache, config.cache_ttl);

        info!(config = ?config, "service client initialized");

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                http,
                cache,
                tokens: RwLock::new(TokenState::default()),
                refresh_lock: Mutex::new(()),
                generation: AtomicU64::new(0),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn self_service(&self) -> Service {
        self.inner.config.self_service
    }

    pub fn cache(&self) -> &TtlCache {
        &self.inner.cache
    }

    pub async fn access_token(&self) -> Option<String> {
        self.inner.tokens.read().await.access.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.inner.tokens.read().await.refresh.clone()
    }

    /// Install a token pair obtained elsewhere (e.g. handed over at startup).
    pub async fn set_tokens(&self, tokens: TokensSet) {
        let mut state = self.inner.tokens.write().await;
        state.access = Some(tokens.access_token);
        state.refresh = Some(tokens.refresh_token);
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Access token and its generation, read under one guard.
    pub(crate) async fn current_access_token(&self) -> Option<(String, u64)> {
        let state = self.inner.tokens.read().await;
        state
            .access
            .clone()
            .map(|token| (token, self.token_generation()))
    }

    pub(crate) fn token_generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// `{protocol}{host}/{service}/{path}`
    pub fn url(
        &self,
        service: Service,
        path: &str,
        host: Option<&str>,
        protocol: Option<&str>,
    ) -> String {
        let config = &self.inner.config;
        format!(
            "{}{}/{}/{}",
            protocol.unwrap_or(&config.default_protocol),
            host.unwrap_or(&config.default_host),
            service,
            path
        )
    }
}
