/*
 * Responsibility
 * - Request body schemas sent to the services
 * - PostData: the payload kinds a POST can carry (json / form / raw bytes / multipart files)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateClientToken {
    pub client_id: String,
    pub client_role: String,
    pub expire_in: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceToken {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyToken {
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateClientToken {
    pub client_access_token: String,
    pub client_refresh_token: String,
    pub expire_in: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateServiceToken {
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub about: Option<String>,
    pub expire_in: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLibrary {
    pub book_id: String,
    pub user_id: String,
    pub status: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBan {
    pub user_id: String,
    pub reason: i32,
    pub comment: String,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyUser {
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlQuery {
    pub query: String,
}

impl GraphqlQuery {
    /// `{"query": "..."}`
    pub fn into_post_data(self) -> PostData {
        let mut body = serde_json::Map::new();
        body.insert("query".to_string(), serde_json::Value::String(self.query));
        PostData::Json(serde_json::Value::Object(body))
    }
}

/// A file part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Body of a POST request.
///
/// Kept as plain data (not a built `reqwest` body) so the same call can be
/// re-sent on retry or after a token refresh.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PostData {
    #[default]
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
    Bytes(Vec<u8>),
    Files(Vec<FilePart>),
}

impl PostData {
    pub fn json<T: Serialize>(body: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::Json(serde_json::to_value(body)?))
    }

    /// Body fragment appended to the URL to form a GraphQL cache key.
    pub fn cache_fragment(&self) -> String {
        match self {
            PostData::Json(value) => value.to_string(),
            PostData::Empty => String::new(),
            PostData::Form(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&"),
            PostData::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            PostData::Files(files) => files
                .iter()
                .map(|f| format!("{}:{}:{}", f.field, f.file_name, f.bytes.len()))
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            PostData::Empty => builder,
            PostData::Json(value) => builder.json(value),
            PostData::Form(pairs) => builder.form(pairs),
            PostData::Bytes(bytes) => builder.body(bytes.clone()),
            PostData::Files(files) => {
                let form = files.iter().fold(reqwest::multipart::Form::new(), |form, f| {
                    form.part(
                        f.field.clone(),
                        reqwest::multipart::Part::bytes(f.bytes.clone())
                            .file_name(f.file_name.clone()),
                    )
                });
                builder.multipart(form)
            }
        }
    }
}
