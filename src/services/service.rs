/*
 * Responsibility
 * - Process-wide identifiers of the microservices
 * - Path segment used in URLs and the cache namespace each service owns
 */
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    #[serde(rename = "_test")]
    Test,
    #[serde(rename = "authentication")]
    Authentication,
    #[serde(rename = "books")]
    Books,
    #[serde(rename = "users")]
    Users,
    #[serde(rename = "forum")]
    Forum,
    #[serde(rename = "internal_media")]
    InternalMedia,
    #[serde(rename = "api_gateway")]
    ApiGateway,
}

impl Service {
    pub const ALL: [Service; 7] = [
        Service::Test,
        Service::Authentication,
        Service::Books,
        Service::Users,
        Service::Forum,
        Service::InternalMedia,
        Service::ApiGateway,
    ];

    /// Path segment of the service, e.g. `books` in `http://host/books/graphql`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Test => "_test",
            Service::Authentication => "authentication",
            Service::Books => "books",
            Service::Users => "users",
            Service::Forum => "forum",
            Service::InternalMedia => "internal_media",
            Service::ApiGateway => "api_gateway",
        }
    }

    /// Redis logical database owned by the service.
    pub fn cache_db(&self) -> u8 {
        match self {
            Service::Test => 0,
            Service::Authentication => 1,
            Service::Books => 2,
            Service::Users => 3,
            Service::Forum => 4,
            Service::InternalMedia => 5,
            Service::ApiGateway => 6,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown service: {0}")]
pub struct UnknownService(pub String);

impl FromStr for Service {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|svc| svc.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownService(s.to_string()))
    }
}
