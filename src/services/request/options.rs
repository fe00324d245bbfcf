//! Per-call overrides of the client defaults.
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Merged over the client's default headers.
    pub add_headers: HashMap<String, String>,
    /// Sent verbatim; skips the default merge and token injection.
    pub headers: Option<HashMap<String, String>>,
    pub timeout_secs: Option<f64>,
    pub max_reconnections: Option<u32>,
    pub use_auth_token: Option<bool>,
    pub auth_header_format: Option<String>,
    pub protocol: Option<String>,
    pub host: Option<String>,
    /// GET: response cache; POST: GraphQL cache.
    pub use_cache: Option<bool>,
    pub cache_ttl: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_headers.insert(name.into(), value.into());
        self
    }

    pub fn explicit_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn timeout_secs(mut self, timeout: f64) -> Self {
        self.timeout_secs = Some(timeout);
        self
    }

    pub fn max_reconnections(mut self, n: u32) -> Self {
        self.max_reconnections = Some(n);
        self
    }

    pub fn without_auth(mut self) -> Self {
        self.use_auth_token = Some(false);
        self
    }

    pub fn use_cache(mut self, enabled: bool) -> Self {
        self.use_cache = Some(enabled);
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }
}
