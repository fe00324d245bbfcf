//! Internal media service endpoints.
use crate::dto::requests::{FilePart, PostData};
use crate::dto::responses::{FileId, HealthCheckBody};
use crate::services::service::Service;

use super::{GetRequest, PostRequest};

pub fn health() -> GetRequest<HealthCheckBody> {
    super::health(Service::InternalMedia)
}

/// Multipart upload under the `file` field.
pub fn upload(file_name: &str, bytes: Vec<u8>) -> PostRequest<FileId> {
    PostRequest::new(
        Service::InternalMedia,
        "api/v1/upload",
        PostData::Files(vec![FilePart {
            field: "file".to_string(),
            file_name: file_name.to_string(),
            bytes,
        }]),
    )
}
