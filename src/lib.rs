/*
 * Responsibility
 * - Typed client for service-to-service calls over HTTP / GraphQL
 * - JWT lifecycle of the calling service, verification of peer and client tokens
 * - TTL response cache in front of GET and GraphQL POST
 */
pub mod config;
pub mod dto;
pub mod error;
pub mod graphql;
pub mod routes;
pub mod services;

pub use config::{ClientConfig, ConfigError};
pub use error::{ErrorCode, ErrorSchema, RequestError};
pub use services::request::{RequestOptions, Response, ResponseBody, ServiceClient};
pub use services::service::Service;
