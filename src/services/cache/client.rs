//! Cache backend interface used by the TTL cache port.
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for cache backend operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache backend errors (transport/command/value).
///
/// Note:
/// - Backends surface these; `TtlCache` swallows them so a broken cache only
///   removes the benefit of caching and never fails a request.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
    #[error("cache value error: {0}")]
    InvalidValue(String),
}

/// A minimal byte-oriented key/value store with per-entry TTL.
///
/// Implementations are shared behind `Arc<dyn CacheClient>`.
#[async_trait]
pub trait CacheClient: Send + Sync + 'static {
    // Returns the cache backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Get the raw value stored under `key`, `None` when absent or expired.
    async fn get_bytes(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    // Store `value` under `key`, overwriting, expiring after `ttl`.
    async fn set_bytes_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()>;
}
