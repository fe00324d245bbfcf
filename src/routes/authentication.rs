//! Authentication service endpoints.
use crate::dto::requests::{
    CreateClientToken, CreateServiceToken, PostData, UpdateClientToken, UpdateServiceToken,
    VerifyToken,
};
use crate::dto::responses::{
    ClientVerifyResponse, HealthCheckBody, ServiceVerifyResponse, TokensSet,
};
use crate::error::RequestError;
use crate::services::auth::roles::{ClientPermissions, Role};
use crate::services::service::Service;

use super::{GetRequest, PostRequest};

pub const CLIENT_JWT_CREATE: &str = "api/v1/client/jwt/create";
pub const CLIENT_JWT_VERIFY: &str = "api/v1/client/jwt/verify";
pub const CLIENT_JWT_UPDATE: &str = "api/v1/client/jwt/update";
pub const SERVICE_JWT_CREATE: &str = "api/v1/service/jwt/create";
pub const SERVICE_JWT_VERIFY: &str = "api/v1/service/jwt/verify";
pub const SERVICE_JWT_UPDATE: &str = "api/v1/service/jwt/update";

pub fn health() -> GetRequest<HealthCheckBody> {
    super::health(Service::Authentication)
}

pub fn client_jwt_create(
    client_id: &str,
    client_role: Role<ClientPermissions>,
    expire_in: Option<i64>,
) -> Result<PostRequest<TokensSet>, RequestError> {
    let body = PostData::json(&CreateClientToken {
        client_id: client_id.to_string(),
        client_role: client_role.name().to_string(),
        expire_in,
    })?;
    Ok(PostRequest::new(Service::Authentication, CLIENT_JWT_CREATE, body))
}

pub fn client_jwt_verify(
    client_access_token: &str,
) -> Result<PostRequest<ClientVerifyResponse>, RequestError> {
    let body = PostData::json(&VerifyToken {
        access_token: client_access_token.to_string(),
    })?;
    Ok(PostRequest::new(Service::Authentication, CLIENT_JWT_VERIFY, body))
}

pub fn client_jwt_update(
    client_access_token: &str,
    client_refresh_token: &str,
    expire_in: Option<i64>,
) -> Result<PostRequest<TokensSet>, RequestError> {
    let body = PostData::json(&UpdateClientToken {
        client_access_token: client_access_token.to_string(),
        client_refresh_token: client_refresh_token.to_string(),
        expire_in,
    })?;
    Ok(PostRequest::new(Service::Authentication, CLIENT_JWT_UPDATE, body))
}

pub fn service_jwt_create(
    login: &str,
    password: &str,
) -> Result<PostRequest<TokensSet>, RequestError> {
    let body = PostData::json(&CreateServiceToken {
        login: login.to_string(),
        password: password.to_string(),
    })?;
    Ok(PostRequest::new(Service::Authentication, SERVICE_JWT_CREATE, body))
}

pub fn service_jwt_verify(
    service_access_token: &str,
) -> Result<PostRequest<ServiceVerifyResponse>, RequestError> {
    let body = PostData::json(&VerifyToken {
        access_token: service_access_token.to_string(),
    })?;
    Ok(PostRequest::new(Service::Authentication, SERVICE_JWT_VERIFY, body))
}

pub fn service_jwt_update(refresh_token: &str) -> Result<PostRequest<TokensSet>, RequestError> {
    let body = PostData::json(&UpdateServiceToken {
        refresh_token: refresh_token.to_string(),
    })?;
    Ok(PostRequest::new(Service::Authentication, SERVICE_JWT_UPDATE, body))
}
