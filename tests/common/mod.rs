#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};
use service_request::services::cache::MemoryCache;
use service_request::{ClientConfig, Service, ServiceClient};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LOGIN: &str = "api_gateway";
pub const PASSWORD: &str = "secret";
pub const BOOKS_TOKEN: &str = "books-access";

pub fn config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::new(Service::ApiGateway, LOGIN, PASSWORD)
        .with_external_services([
            Service::Authentication,
            Service::Books,
            Service::Users,
            Service::InternalMedia,
        ])
        .with_host("http://", server.address().to_string());
    config.default_timeout_secs = 1.0;
    config
}

pub fn client_with(config: ClientConfig) -> (ServiceClient, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::new());
    let client = ServiceClient::new(config, cache.clone()).expect("valid client config");
    (client, cache)
}

pub fn client(server: &MockServer) -> (ServiceClient, Arc<MemoryCache>) {
    client_with(config(server))
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn service_payload(sub: &str, lifetime_secs: i64) -> Value {
    let now = now();
    json!({
        "type": "ACCESS",
        "iss": "authentication",
        "sub": sub,
        "exp": now + lifetime_secs,
        "iat": now,
        "bearer": "SERVICE",
        "role": "MINIMUM"
    })
}

pub fn client_payload(sub: &str, lifetime_secs: i64) -> Value {
    let now = now();
    json!({
        "type": "ACCESS",
        "iss": "authentication",
        "sub": sub,
        "exp": now + lifetime_secs,
        "iat": now,
        "bearer": "CLIENT",
        "role": "MEMBER"
    })
}

pub async fn mount_login(server: &MockServer, access: &str, refresh: &str) {
    Mock::given(method("POST"))
        .and(path("/authentication/api/v1/service/jwt/create"))
        .and(body_partial_json(json!({"login": LOGIN, "password": PASSWORD})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access,
            "refresh_token": refresh
        })))
        .mount(server)
        .await;
}

/// Verify endpoint answering `payload` as valid for `token`.
pub async fn mount_service_verify(server: &MockServer, token: &str, payload: Value) {
    Mock::given(method("POST"))
        .and(path("/authentication/api/v1/service/jwt/verify"))
        .and(body_partial_json(json!({"access_token": token})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_verify": true,
            "payload": payload
        })))
        .mount(server)
        .await;
}

pub async fn mount_service_reject(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/authentication/api/v1/service/jwt/verify"))
        .and(body_partial_json(json!({"access_token": token})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_verify": false,
            "error": {"error": "invalid jwt"}
        })))
        .mount(server)
        .await;
}

/// Successful answer presenting the Books service token.
pub fn from_books(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("Authorization", format!("Bearer {}", BOOKS_TOKEN).as_str())
        .set_body_json(body)
}

/// Login as `access-1` and trust the Books responder.
pub async fn mount_trusted_books(server: &MockServer) {
    mount_login(server, "access-1", "refresh-1").await;
    mount_service_verify(server, BOOKS_TOKEN, service_payload("books", 600)).await;
}
