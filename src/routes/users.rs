//! Users service endpoints.
use chrono::{DateTime, Utc};

use crate::dto::requests::{CreateBan, CreateLibrary, CreateUser, PostData, UpdateUser, VerifyUser};
use crate::dto::responses::{
    ClientVerifyResponse, GraphqlResponse, HealthCheckBody, LibrariesData, SuccessBody, TokensSet,
    UsersData,
};
use crate::error::RequestError;
use crate::graphql::query::{OperationType, QueryArgs, Selection};
use crate::services::service::Service;

use super::{GetRequest, PostRequest, graphql_request};

pub const VERIFY_USER: &str = "api/v1/verify-user";

pub fn health() -> GetRequest<HealthCheckBody> {
    super::health(Service::Users)
}

#[derive(Debug, Clone, Default)]
pub struct UsersFilter {
    pub ids: Option<Vec<String>>,
    pub usernames: Option<Vec<String>>,
    pub first_names: Option<Vec<String>>,
    pub last_names: Option<Vec<String>>,
    pub roles: Option<Vec<String>>,
    pub is_banned: Option<bool>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct LibrariesFilter {
    pub ids: Option<Vec<String>>,
    pub user_ids: Option<Vec<String>>,
    pub book_ids: Option<Vec<String>>,
    pub statuses: Option<Vec<String>>,
}

pub fn users(fields: &[Selection], filter: &UsersFilter) -> PostRequest<GraphqlResponse<UsersData>> {
    let args = QueryArgs::new()
        .strings("ids", filter.ids.as_deref())
        .strings("usernames", filter.usernames.as_deref())
        .strings("first_names", filter.first_names.as_deref())
        .strings("last_names", filter.last_names.as_deref())
        .strings("roles", filter.roles.as_deref())
        .boolean("is_banned", filter.is_banned)
        .int("offset", filter.offset)
        .int("limit", filter.limit);
    graphql_request(Service::Users, OperationType::Query, "users", &args, fields)
}

pub fn libraries(
    fields: &[Selection],
    filter: &LibrariesFilter,
) -> PostRequest<GraphqlResponse<LibrariesData>> {
    let args = QueryArgs::new()
        .strings("ids", filter.ids.as_deref())
        .strings("user_ids", filter.user_ids.as_deref())
        .strings("book_ids", filter.book_ids.as_deref())
        .strings("statuses", filter.statuses.as_deref());
    graphql_request(Service::Users, OperationType::Query, "libraries", &args, fields)
}

pub fn create_user(body: CreateUser) -> Result<PostRequest<TokensSet>, RequestError> {
    Ok(PostRequest::new(
        Service::Users,
        "api/v1/create-user",
        PostData::json(&body)?,
    ))
}

pub fn create_library(
    book_id: &str,
    user_id: &str,
    status: i32,
) -> Result<PostRequest<SuccessBody>, RequestError> {
    let body = PostData::json(&CreateLibrary {
        book_id: book_id.to_string(),
        user_id: user_id.to_string(),
        status,
    })?;
    Ok(PostRequest::new(Service::Users, "api/v1/create-library", body))
}

pub fn create_ban(
    user_id: &str,
    reason: i32,
    comment: &str,
    end_date: DateTime<Utc>,
) -> Result<PostRequest<SuccessBody>, RequestError> {
    let body = PostData::json(&CreateBan {
        user_id: user_id.to_string(),
        reason,
        comment: comment.to_string(),
        end_date,
    })?;
    Ok(PostRequest::new(Service::Users, "api/v1/create-ban", body))
}

pub fn verify_user(access_token: &str) -> Result<PostRequest<ClientVerifyResponse>, RequestError> {
    let body = PostData::json(&VerifyUser {
        access_token: access_token.to_string(),
    })?;
    Ok(PostRequest::new(Service::Users, VERIFY_USER, body))
}

pub fn update_user(refresh_token: &str) -> Result<PostRequest<TokensSet>, RequestError> {
    let body = PostData::json(&UpdateUser {
        refresh_token: refresh_token.to_string(),
    })?;
    Ok(PostRequest::new(Service::Users, "api/v1/update-user", body))
}
