pub mod requests;
pub mod responses;

pub use requests::PostData;
pub use responses::{ClientErrorBody, ErrorDetail, HealthCheckBody, ServerErrorBody, TokensSet};
