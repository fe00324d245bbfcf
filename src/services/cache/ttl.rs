//! TTL cache port.
//!
//! `set` and `get` never fail: backend errors are logged and turned into a
//! no-op / a miss, so caching stays a pure optimization.
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::services::cache::client::CacheClient;

/// Default lifetime of a cache entry when the caller passes none.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct TtlCache {
    backend: Arc<dyn CacheClient>,
    default_ttl: Duration,
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("backend", &self.backend.backend_name())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl TtlCache {
    pub fn new(backend: Arc<dyn CacheClient>) -> Self {
        Self::with_default_ttl(backend, DEFAULT_CACHE_TTL)
    }

    pub fn with_default_ttl(backend: Arc<dyn CacheClient>, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Store `value` under `key` for `ttl` (or the default lifetime).
    pub async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        if let Err(e) = self.backend.set_bytes_with_ttl(key, value, ttl).await {
            warn!(
                backend = self.backend.backend_name(),
                error = %e,
                "cache set failed"
            );
            return;
        }
        debug!(
            backend = self.backend.backend_name(),
            ttl_seconds = ttl.as_secs(),
            "cache set"
        );
    }

    /// Read `key`; `None` on a miss or when the backend is unavailable.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.backend.get_bytes(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    backend = self.backend.backend_name(),
                    error = %e,
                    "cache get failed"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::client::{CacheError, CacheResult};
    use crate::services::cache::memory::MemoryCache;
    use async_trait::async_trait;

    struct BrokenBackend;

    #[async_trait]
    impl CacheClient for BrokenBackend {
        fn backend_name(&self) -> &'static str {
            "broken"
        }

        async fn get_bytes(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
            Err(CacheError::BackendConnection("connection refused".into()))
        }

        async fn set_bytes_with_ttl(
            &self,
            _key: &str,
            _value: &[u8],
            _ttl: Duration,
        ) -> CacheResult<()> {
            Err(CacheError::BackendConnection("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn backend_failures_are_swallowed() {
        let cache = TtlCache::new(Arc::new(BrokenBackend));
        cache.set("k", b"v", None).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn default_ttl_applies_when_none_given() {
        let backend = Arc::new(MemoryCache::new());
        let cache = TtlCache::with_default_ttl(backend.clone(), Duration::from_secs(42));
        cache.set("k", b"v", None).await;

        let ttl = backend.ttl_of("k").await.unwrap();
        assert!(ttl <= Duration::from_secs(42) && ttl > Duration::from_secs(40));
        assert_eq!(cache.get("k").await, Some(b"v".to_vec()));
    }
}
