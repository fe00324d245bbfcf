pub mod client;
pub mod executor;
pub mod facade;
pub mod headers;
pub mod options;
pub mod response;

pub use client::ServiceClient;
pub use executor::{BoxFuture, Method};
pub use options::RequestOptions;
pub use response::{CachedResponse, RawResponse, Response, ResponseBody};
