/*
 * Responsibility
 * - Typed request descriptors (service + path + body + expected response type)
 * - One constructor function per endpoint, grouped by owning service
 */
use std::fmt;
use std::marker::PhantomData;

use crate::dto::requests::{GraphqlQuery, PostData};
use crate::graphql::query::{OperationType, QueryArgs, Selection, build_query};
use crate::services::service::Service;

pub mod authentication;
pub mod books;
pub mod internal_media;
pub mod users;

/// GET `{service}/{path}` answered with `T`.
pub struct GetRequest<T> {
    pub service: Service,
    pub path: String,
    response: PhantomData<fn() -> T>,
}

impl<T> GetRequest<T> {
    pub fn new(service: Service, path: impl Into<String>) -> Self {
        Self {
            service,
            path: path.into(),
            response: PhantomData,
        }
    }
}

/// POST `{service}/{path}` answered with `T`.
pub struct PostRequest<T> {
    pub service: Service,
    pub path: String,
    pub post_data: PostData,
    pub is_graphql: bool,
    response: PhantomData<fn() -> T>,
}

impl<T> PostRequest<T> {
    pub fn new(service: Service, path: impl Into<String>, post_data: PostData) -> Self {
        Self {
            service,
            path: path.into(),
            post_data,
            is_graphql: false,
            response: PhantomData,
        }
    }

    /// POST `{service}/graphql` with `{"query": ...}`.
    pub fn graphql(service: Service, query: String) -> Self {
        Self {
            service,
            path: "graphql".to_string(),
            post_data: GraphqlQuery { query }.into_post_data(),
            is_graphql: true,
            response: PhantomData,
        }
    }
}

impl<T> Clone for GetRequest<T> {
    fn clone(&self) -> Self {
        Self::new(self.service, self.path.clone())
    }
}

impl<T> Clone for PostRequest<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service,
            path: self.path.clone(),
            post_data: self.post_data.clone(),
            is_graphql: self.is_graphql,
            response: PhantomData,
        }
    }
}

impl<T> fmt::Debug for GetRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetRequest")
            .field("service", &self.service)
            .field("path", &self.path)
            .finish()
    }
}

impl<T> fmt::Debug for PostRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostRequest")
            .field("service", &self.service)
            .field("path", &self.path)
            .field("is_graphql", &self.is_graphql)
            .finish_non_exhaustive()
    }
}

pub(crate) fn graphql_request<T>(
    service: Service,
    operation: OperationType,
    name: &str,
    args: &QueryArgs,
    fields: &[Selection],
) -> PostRequest<T> {
    PostRequest::graphql(service, build_query(operation, name, args, fields))
}

pub(crate) fn health<T>(service: Service) -> GetRequest<T> {
    GetRequest::new(service, "health")
}
