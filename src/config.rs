/*
 * Responsibility
 * - Self-service client settings (identity, credentials, defaults for every call)
 * - Environment loading (SERVICE_* keys, .env via dotenvy) and validation
 */
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::services::service::Service;

pub const DEFAULT_TOKEN_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60 * 4);
pub const DEFAULT_MAX_RECONNECTIONS: u32 = 3;
pub const DEFAULT_TIMEOUT_SECS: f64 = 3.0;
pub const DEFAULT_PROTOCOL: &str = "http://";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_AUTH_HEADER_FORMAT: &str = "Bearer {}";
pub const JWT_EXPIRED_STATUS: u16 = 419;
pub const JWT_INVALID_STATUS: u16 = 498;

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct ClientConfig {
    pub self_service: Service,
    pub login: String,
    pub password: String,
    pub external_services: Vec<Service>,
    pub default_headers: HashMap<String, String>,

    pub token_refresh_interval: Duration,
    pub default_max_reconnections: u32,
    pub default_timeout_secs: f64,
    pub default_protocol: String,
    pub default_host: String,
    pub default_use_auth_token: bool,
    // `{}` is replaced by the access token
    pub auth_header_format: String,

    pub use_get_cache: bool,
    pub use_graphql_cache: bool,
    pub cache_ttl: Duration,
    pub cache_url: Option<String>,

    /// Service whose verify endpoint checks client tokens
    /// (Authentication or Users).
    pub client_verify_service: Service,

    pub jwt_expired_status: u16,
    pub jwt_invalid_status: u16,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("self_service", &self.self_service)
            .field("login", &self.login)
            .field("password", &"<hidden>")
            .field("external_services", &self.external_services)
            .field("default_headers", &self.default_headers.keys())
            .field("token_refresh_interval", &self.token_refresh_interval)
            .field("default_max_reconnections", &self.default_max_reconnections)
            .field("default_timeout_secs", &self.default_timeout_secs)
            .field("default_protocol", &self.default_protocol)
            .field("default_host", &self.default_host)
            .field("default_use_auth_token", &self.default_use_auth_token)
            .field("auth_header_format", &self.auth_header_format)
            .field("use_get_cache", &self.use_get_cache)
            .field("use_graphql_cache", &self.use_graphql_cache)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_url", &self.cache_url)
            .field("client_verify_service", &self.client_verify_service)
            .field("jwt_expired_status", &self.jwt_expired_status)
            .field("jwt_invalid_status", &self.jwt_invalid_status)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(
        self_service: Service,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            self_service,
            login: login.into(),
            password: password.into(),
            external_services: Vec::new(),
            default_headers: HashMap::new(),
            token_refresh_interval: DEFAULT_TOKEN_REFRESH_INTERVAL,
            default_max_reconnections: DEFAULT_MAX_RECONNECTIONS,
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_protocol: DEFAULT_PROTOCOL.to_string(),
            default_host: DEFAULT_HOST.to_string(),
            default_use_auth_token: true,
            auth_header_format: DEFAULT_AUTH_HEADER_FORMAT.to_string(),
            use_get_cache: true,
            use_graphql_cache: true,
            cache_ttl: crate::services::cache::DEFAULT_CACHE_TTL,
            cache_url: None,
            client_verify_service: Service::Authentication,
            jwt_expired_status: JWT_EXPIRED_STATUS,
            jwt_invalid_status: JWT_INVALID_STATUS,
        }
    }

    pub fn with_external_services(mut self, services: impl IntoIterator<Item = Service>) -> Self {
        self.external_services = services.into_iter().collect();
        self
    }

    pub fn with_host(mut self, protocol: impl Into<String>, host: impl Into<String>) -> Self {
        self.default_protocol = protocol.into();
        self.default_host = host.into();
        self
    }

    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Own identity must not be listed among the services this client calls.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.external_services.contains(&self.self_service) {
            return Err(ConfigError::Invalid("SERVICE_EXTERNAL"));
        }
        if self.default_max_reconnections < 2 {
            return Err(ConfigError::Invalid("SERVICE_MAX_RECONNECTIONS"));
        }
        if !(self.default_timeout_secs >= 0.0) {
            return Err(ConfigError::Invalid("SERVICE_TIMEOUT_SECONDS"));
        }
        if !self.auth_header_format.contains("{}") {
            return Err(ConfigError::Invalid("SERVICE_AUTH_HEADER_FORMAT"));
        }
        Ok(())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in `from_env`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let self_service = lookup("SERVICE_SELF")
            .ok_or(ConfigError::Missing("SERVICE_SELF"))?
            .parse::<Service>()
            .map_err(|_| ConfigError::Invalid("SERVICE_SELF"))?;
        let login = lookup("SERVICE_LOGIN").ok_or(ConfigError::Missing("SERVICE_LOGIN"))?;
        let password = lookup("SERVICE_PASSWORD").ok_or(ConfigError::Missing("SERVICE_PASSWORD"))?;

        let mut config = Self::new(self_service, login, password);

        config.external_services = lookup("SERVICE_EXTERNAL")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Service>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::Invalid("SERVICE_EXTERNAL"))?;

        if let Some(host) = lookup("SERVICE_HOST") {
            config.default_host = host;
        }
        if let Some(protocol) = lookup("SERVICE_PROTOCOL") {
            config.default_protocol = protocol;
        }
        if let Some(format) = lookup("SERVICE_AUTH_HEADER_FORMAT") {
            config.auth_header_format = format;
        }
        if let Some(v) = lookup("SERVICE_TIMEOUT_SECONDS") {
            config.default_timeout_secs = v
                .parse::<f64>()
                .map_err(|_| ConfigError::Invalid("SERVICE_TIMEOUT_SECONDS"))?;
        }
        if let Some(v) = lookup("SERVICE_MAX_RECONNECTIONS") {
            config.default_max_reconnections = v
                .parse::<u32>()
                .map_err(|_| ConfigError::Invalid("SERVICE_MAX_RECONNECTIONS"))?;
        }
        if let Some(v) = lookup("SERVICE_TOKEN_REFRESH_SECONDS") {
            config.token_refresh_interval = v
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid("SERVICE_TOKEN_REFRESH_SECONDS"))?;
        }
        if let Some(v) = lookup("SERVICE_CACHE_TTL_SECONDS") {
            config.cache_ttl = v
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid("SERVICE_CACHE_TTL_SECONDS"))?;
        }
        if let Some(v) = lookup("SERVICE_USE_GET_CACHE") {
            config.use_get_cache = parse_bool(&v).ok_or(ConfigError::Invalid("SERVICE_USE_GET_CACHE"))?;
        }
        if let Some(v) = lookup("SERVICE_USE_GRAPHQL_CACHE") {
            config.use_graphql_cache =
                parse_bool(&v).ok_or(ConfigError::Invalid("SERVICE_USE_GRAPHQL_CACHE"))?;
        }
        if let Some(v) = lookup("SERVICE_CLIENT_VERIFY") {
            config.client_verify_service = match v.parse::<Service>() {
                Ok(s @ (Service::Authentication | Service::Users)) => s,
                _ => return Err(ConfigError::Invalid("SERVICE_CLIENT_VERIFY")),
            };
        }
        config.cache_url = lookup("SERVICE_CACHE_URL").filter(|s| !s.is_empty());

        config.validate()?;
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
