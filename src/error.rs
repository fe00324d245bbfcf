/*
 * Responsibility
 * - Structured error codes exchanged between services (ErrorCode / ErrorSchema)
 * - RequestError: the small set of conditions raised to callers
 *   (configuration, exhausted transport retries, credentials, invalid JWT, decode)
 * - 4xx/5xx responses are NOT errors here; they come back as typed response bodies
 */
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::service::Service;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "the passed parameters are not correct")]
    InvalidParameters,
    #[serde(rename = "invalid credentials")]
    BadCredentials,
    #[serde(rename = "validation error")]
    ValidateError,

    #[serde(rename = "there is no permission for this call")]
    AccessError,
    #[serde(rename = "invalid jwt")]
    JwtInvalid,
    #[serde(rename = "jwt has expired")]
    JwtExpired,
    #[serde(rename = "jwt sub in access and refresh tokens are not equal")]
    JwtSubNotEqual,

    #[serde(rename = "client there is no permission for this call")]
    ClientAccessError,
    #[serde(rename = "client has an invalid jwt")]
    ClientJwtInvalid,
    #[serde(rename = "client has an jwt has expired")]
    ClientJwtExpired,
    #[serde(rename = "client jwt sub in access and refresh tokens are not equal")]
    ClientJwtSubNotEqual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSchema {
    pub error: ErrorCode,
    #[serde(default)]
    pub extra: Option<String>,
}

impl ErrorSchema {
    pub fn new(error: ErrorCode) -> Self {
        Self { error, extra: None }
    }

    pub fn with_extra(error: ErrorCode, extra: impl Into<String>) -> Self {
        Self {
            error,
            extra: Some(extra.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    // configuration: raised before any I/O, never retried
    #[error("services cannot make requests to themselves ({0})")]
    SelfRequest(Service),
    #[error("duplicate header values: {0}")]
    DuplicateHeaders(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid configuration: {0}")]
    Config(String),

    // transport: raised once the reconnection budget is spent
    #[error("service {service} did not respond {attempts} times (timeout {timeout_secs})")]
    Connection {
        service: Service,
        attempts: u32,
        timeout_secs: f64,
    },
    #[error("transport error calling {service}: {message}")]
    Transport { service: Service, message: String },

    // identity bootstrap
    #[error("failed to get jwt tokens (status {status}): {detail}")]
    Credentials { status: u16, detail: String },

    #[error("invalid jwt: {0:?}")]
    InvalidJwt(ErrorSchema),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to decode response from {service}: {source}")]
    Decode {
        service: Service,
        #[source]
        source: serde_json::Error,
    },
}

impl RequestError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Errors detected synchronously from the call's own arguments/config.
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            RequestError::SelfRequest(_)
                | RequestError::DuplicateHeaders(_)
                | RequestError::InvalidArgument(_)
                | RequestError::Config(_)
        )
    }

    /// Structured code when the error carries one.
    pub fn error_schema(&self) -> Option<&ErrorSchema> {
        match self {
            RequestError::InvalidJwt(schema) => Some(schema),
            _ => None,
        }
    }
}
