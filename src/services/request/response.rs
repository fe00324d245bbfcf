/*
 * Responsibility
 * - Response<T>: status, headers, is_error and a body picked by status class
 * - Classification of a raw HTTP exchange (>= 500 / >= 400 / success)
 * - Cached form of a successful response (body kept as untyped JSON)
 */
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dto::responses::{ClientErrorBody, ServerErrorBody};
use crate::error::RequestError;
use crate::services::service::Service;

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody<T> {
    Success(T),
    ClientError(ClientErrorBody),
    ServerError(ServerErrorBody),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub is_error: bool,
    pub body: ResponseBody<T>,
}

impl<T> Response<T> {
    pub fn success(&self) -> Option<&T> {
        match &self.body {
            ResponseBody::Success(body) => Some(body),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self.body {
            ResponseBody::Success(body) => Some(body),
            _ => None,
        }
    }

    pub fn client_error(&self) -> Option<&ClientErrorBody> {
        match &self.body {
            ResponseBody::ClientError(body) => Some(body),
            _ => None,
        }
    }

    pub fn server_error(&self) -> Option<&ServerErrorBody> {
        match &self.body {
            ResponseBody::ServerError(body) => Some(body),
            _ => None,
        }
    }
}

/// One HTTP exchange before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub text: String,
}

impl RawResponse {
    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn classify<T: DeserializeOwned>(self, service: Service) -> Result<Response<T>, RequestError> {
        let body = if self.status_code >= 500 {
            ResponseBody::ServerError(ServerErrorBody { error: self.text })
        } else if self.status_code >= 400 {
            ResponseBody::ClientError(ClientErrorBody::from_text(&self.text))
        } else {
            let body = serde_json::from_str(&self.text)
                .map_err(|source| RequestError::Decode { service, source })?;
            ResponseBody::Success(body)
        };
        Ok(Response {
            status_code: self.status_code,
            is_error: self.status_code >= 400,
            headers: self.headers,
            body,
        })
    }
}

/// A successful response as stored in the response cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: serde_json::Value,
}

impl CachedResponse {
    pub fn into_response<T: DeserializeOwned>(self) -> Result<Response<T>, serde_json::Error> {
        Ok(Response {
            status_code: self.status_code,
            headers: self.headers,
            is_error: false,
            body: ResponseBody::Success(serde_json::from_value(self.body)?),
        })
    }
}
