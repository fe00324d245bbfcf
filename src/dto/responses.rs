/*
 * Responsibility
 * - Response body schemas returned by the services
 * - 4xx / 5xx error bodies the executor builds from error responses
 */
use serde::{Deserialize, Serialize};

use crate::error::ErrorSchema;
use crate::graphql::models::{Author, Book, Category, Library, Review, ReviewResponse, User};
use crate::services::auth::payload::{ClientAccessTokenPayload, ServiceAccessTokenPayload};

/// `detail` of a 4xx body: structured codes, or the raw text when the body
/// is not shaped that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Errors(Vec<ErrorSchema>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientErrorBody {
    pub detail: ErrorDetail,
}

impl ClientErrorBody {
    /// Decode `{"detail": ...}`; anything else is kept verbatim as text.
    pub fn from_text(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_else(|_| Self {
            detail: ErrorDetail::Text(text.to_string()),
        })
    }

    pub fn errors(&self) -> &[ErrorSchema] {
        match &self.detail {
            ErrorDetail::Errors(errors) => errors,
            ErrorDetail::Text(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckBody {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokensSet {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessBody {
    // wire name as sent by the services
    #[serde(rename = "succes", default = "always_true")]
    pub success: bool,
}

fn always_true() -> bool {
    true
}

// `default` on `payload` must not add a `P: Default` bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "P: Serialize", deserialize = "P: Deserialize<'de>"))]
pub struct VerifyResponse<P> {
    pub is_verify: bool,
    #[serde(default)]
    pub payload: Option<P>,
    #[serde(default)]
    pub error: Option<ErrorSchema>,
}

pub type ServiceVerifyResponse = VerifyResponse<ServiceAccessTokenPayload>;
pub type ClientVerifyResponse = VerifyResponse<ClientAccessTokenPayload>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileId {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooksData {
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooksDeepData {
    #[serde(rename = "booksDeep")]
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorsData {
    pub authors: Vec<Author>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesData {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewsData {
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewsDeepData {
    #[serde(rename = "reviewsDeep")]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReviewData {
    #[serde(rename = "createReview")]
    pub result: ReviewResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReviewData {
    #[serde(rename = "updateReview")]
    pub result: ReviewResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteReviewData {
    #[serde(rename = "deleteReview")]
    pub result: ReviewResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersData {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibrariesData {
    pub libraries: Vec<Library>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn client_error_body_decodes_structured_detail() {
        let body = ClientErrorBody::from_text(r#"{"detail": [{"error": "invalid credentials"}]}"#);
        assert_eq!(body.errors().len(), 1);
        assert_eq!(body.errors()[0].error, ErrorCode::BadCredentials);
    }

    #[test]
    fn client_error_body_keeps_string_detail() {
        let body = ClientErrorBody::from_text(r#"{"detail": "Not Found"}"#);
        assert_eq!(body.detail, ErrorDetail::Text("Not Found".into()));
    }

    #[test]
    fn client_error_body_falls_back_to_raw_text() {
        let body = ClientErrorBody::from_text("<html>bad gateway</html>");
        assert_eq!(
            body.detail,
            ErrorDetail::Text("<html>bad gateway</html>".into())
        );
        assert!(body.errors().is_empty());
    }

    #[test]
    fn verify_response_without_payload() {
        let body: ServiceVerifyResponse = serde_json::from_str(
            r#"{"is_verify": false, "payload": null, "error": {"error": "invalid jwt"}}"#,
        )
        .unwrap();
        assert!(!body.is_verify);
        assert!(body.payload.is_none());
        assert_eq!(body.error.unwrap().error, ErrorCode::JwtInvalid);
    }

    #[test]
    fn verify_response_with_payload_and_no_error_field() {
        let body: ServiceVerifyResponse = serde_json::from_value(serde_json::json!({
            "is_verify": true,
            "payload": {
                "type": "ACCESS",
                "iss": "authentication",
                "sub": "books",
                "exp": 2_000,
                "iat": 1_000,
                "bearer": "SERVICE",
                "role": "MINIMUM"
            }
        }))
        .unwrap();
        assert!(body.is_verify);
        assert_eq!(body.payload.unwrap().sub, crate::services::service::Service::Books);
        assert!(body.error.is_none());

        // a payload type without `Default` still decodes when the field is absent
        let body: ClientVerifyResponse =
            serde_json::from_str(r#"{"is_verify": false}"#).unwrap();
        assert!(body.payload.is_none());
    }
}
