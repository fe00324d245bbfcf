pub mod auth;
pub mod cache;
pub mod request;
pub mod service;
