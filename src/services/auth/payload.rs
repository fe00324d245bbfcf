//! Decoded token claims for service and client bearers.
//!
//! NOTE:
//! - Access payloads carry a role resolved from the universe of their bearer,
//!   so a client token naming a service role fails to decode.
//! - `exp`/`iat` are unix seconds.
use serde::{Deserialize, Serialize};

use crate::services::auth::roles::{ClientPermissions, Permissions, Role, ServicePermissions};
use crate::services::service::Service;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenBearer {
    Client,
    Service,
}

impl TokenBearer {
    /// Suffix appended to a token string to build its verification cache key.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenBearer::Client => "CLIENT",
            TokenBearer::Service => "SERVICE",
        }
    }

    pub(crate) fn universe(&self) -> &'static str {
        match self {
            TokenBearer::Client => "client",
            TokenBearer::Service => "service",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    Access,
    Refresh,
}

pub type UserId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize",
    deserialize = "S: Deserialize<'de>, P: Permissions"
))]
pub struct AccessTokenPayload<S, P> {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub iss: String,
    pub sub: S,
    pub exp: i64,
    pub iat: i64,
    pub bearer: TokenBearer,
    pub role: Role<P>,
}

pub type ServiceAccessTokenPayload = AccessTokenPayload<Service, ServicePermissions>;
pub type ClientAccessTokenPayload = AccessTokenPayload<UserId, ClientPermissions>;

impl<S, P: Permissions> AccessTokenPayload<S, P> {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_unix())
    }

    /// Seconds left until `exp`; zero or negative once expired.
    pub fn remaining_seconds(&self, now: i64) -> i64 {
        self.exp - now
    }

    /// Claims are consistent: an access token of the matching bearer with `exp > iat`.
    pub fn is_well_formed(&self) -> bool {
        self.token_type == TokenType::Access && self.bearer == P::BEARER && self.exp > self.iat
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshTokenPayload<S> {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub iss: String,
    pub sub: S,
    pub exp: i64,
    pub iat: i64,
}

impl<S> RefreshTokenPayload<S> {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Replace all but the last `visible_chars` characters with `*`.
pub fn mask_token(token: &str, visible_chars: usize) -> String {
    let len = token.chars().count();
    if len <= visible_chars {
        return token.to_string();
    }
    let visible: String = token.chars().skip(len - visible_chars).collect();
    format!("{}{}", "*".repeat(len - visible_chars), visible)
}
