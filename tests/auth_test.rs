mod common;

use std::time::Duration;

use serde_json::json;
use service_request::services::auth::{NEGATIVE_VERDICT, TokenBearer, verification_cache_key};
use service_request::services::cache::CacheClient;
use service_request::{ErrorCode, RequestError, Service};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    client, client_payload, client_with, config, mount_login, mount_service_reject,
    mount_service_verify, service_payload,
};

#[tokio::test]
async fn test_login_stores_token_pair() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;

    let (client, _) = client(&server);
    client.get_tokens_by_login().await.unwrap();

    assert_eq!(client.access_token().await.as_deref(), Some("access-1"));
    assert_eq!(client.refresh_token().await.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_wrong_password_is_a_credentials_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authentication/api/v1/service/jwt/create"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": [{"error": "invalid credentials"}]})),
        )
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let err = client.get_tokens_by_login().await.unwrap_err();

    match err {
        RequestError::Credentials { status, detail } => {
            assert_eq!(status, 401);
            assert!(detail.contains("invalid credentials"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(client.access_token().await.is_none());
}

#[tokio::test]
async fn test_rejected_refresh_token_falls_back_to_login() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    Mock::given(method("POST"))
        .and(path("/authentication/api/v1/service/jwt/update"))
        .and(body_partial_json(json!({"refresh_token": "refresh-1"})))
        .respond_with(ResponseTemplate::new(498).set_body_string("invalid jwt"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    client.get_tokens_by_login().await.unwrap();
    client.get_tokens().await.unwrap();

    let logins = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/authentication/api/v1/service/jwt/create")
        .count();
    assert_eq!(logins, 2);
    assert_eq!(client.access_token().await.as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_valid_verdict_lives_until_token_expiry() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    mount_service_verify(&server, "users-token", service_payload("users", 120)).await;

    let (client, cache) = client(&server);
    let payload = client
        .verify_service_token("users-token", Some(Service::Users))
        .await
        .unwrap()
        .expect("token is valid");
    assert_eq!(payload.sub, Service::Users);

    let key = verification_cache_key("users-token", TokenBearer::Service);
    let ttl = cache.ttl_of(&key).await.expect("verdict cached");
    assert!(ttl <= Duration::from_secs(120));
    assert!(ttl > Duration::from_secs(110));

    // served from cache from now on
    let again = client
        .verify_service_token("users-token", Some(Service::Users))
        .await
        .unwrap();
    assert_eq!(again, Some(payload));
    let verifications = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/authentication/api/v1/service/jwt/verify")
        .count();
    assert_eq!(verifications, 1);
}

#[tokio::test]
async fn test_invalid_verdict_uses_default_ttl() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    mount_service_reject(&server, "bad-token").await;

    let (client, cache) = client(&server);
    let verdict = client.verify_service_token("bad-token", None).await.unwrap();
    assert!(verdict.is_none());

    let key = verification_cache_key("bad-token", TokenBearer::Service);
    assert_eq!(
        cache.get_bytes(&key).await.unwrap().as_deref(),
        Some(NEGATIVE_VERDICT)
    );
    let ttl = cache.ttl_of(&key).await.unwrap();
    assert!(ttl <= client.cache().default_ttl());
    assert!(ttl > client.cache().default_ttl() - Duration::from_secs(5));
}

#[tokio::test]
async fn test_token_of_another_service_is_rejected() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    mount_service_verify(&server, "users-token", service_payload("users", 600)).await;

    let (client, cache) = client(&server);
    let verdict = client
        .verify_service_token("users-token", Some(Service::Books))
        .await
        .unwrap();
    assert!(verdict.is_none());

    let key = verification_cache_key("users-token", TokenBearer::Service);
    assert_eq!(
        cache.get_bytes(&key).await.unwrap().as_deref(),
        Some(NEGATIVE_VERDICT)
    );
}

#[tokio::test]
async fn test_cached_payload_is_checked_against_expected_service() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    mount_service_verify(&server, "users-token", service_payload("users", 600)).await;

    let (client, _) = client(&server);
    assert!(
        client
            .verify_service_token("users-token", None)
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        client
            .verify_service_token("users-token", Some(Service::Books))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_verify_endpoint_failure_is_not_cached() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    Mock::given(method("POST"))
        .and(path("/authentication/api/v1/service/jwt/verify"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (client, cache) = client(&server);
    let verdict = client.verify_service_token("some-token", None).await.unwrap();
    assert!(verdict.is_none());

    let key = verification_cache_key("some-token", TokenBearer::Service);
    assert!(cache.get_bytes(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_expired_payload_is_returned_but_not_cached() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    let mut payload = service_payload("users", 0);
    payload["iat"] = json!(common::now() - 60);
    mount_service_verify(&server, "old-token", payload).await;

    let (client, cache) = client(&server);
    let verdict = client.verify_service_token("old-token", None).await.unwrap();
    assert!(verdict.is_some());

    let key = verification_cache_key("old-token", TokenBearer::Service);
    assert!(cache.get_bytes(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_client_token_verified_by_authentication() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    Mock::given(method("POST"))
        .and(path("/authentication/api/v1/client/jwt/verify"))
        .and(body_partial_json(json!({"access_token": "user-token"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_verify": true,
            "payload": client_payload("user-1", 300)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client(&server);
    let payload = client.require_client_token("user-token").await.unwrap();
    assert_eq!(payload.sub, "user-1");

    // cached: the mock above expects a single call
    let again = client.verify_client_token("user-token").await.unwrap();
    assert_eq!(again, Some(payload));
}

#[tokio::test]
async fn test_client_token_verified_by_users_when_configured() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    mount_service_verify(&server, "users-access", service_payload("users", 600)).await;
    Mock::given(method("POST"))
        .and(path("/users/api/v1/verify-user"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Authorization", "Bearer users-access")
                .set_body_json(json!({"is_verify": false})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config(&server);
    config.client_verify_service = Service::Users;
    let (client, cache) = client_with(config);

    let err = client.require_client_token("user-token").await.unwrap_err();
    assert_eq!(
        err.error_schema().map(|s| s.error),
        Some(ErrorCode::ClientJwtInvalid)
    );

    let key = verification_cache_key("user-token", TokenBearer::Client);
    assert_eq!(
        cache.get_bytes(&key).await.unwrap().as_deref(),
        Some(NEGATIVE_VERDICT)
    );
}

#[tokio::test]
async fn test_require_service_token_maps_invalid_to_error() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    mount_service_reject(&server, "bad-token").await;

    let (client, _) = client(&server);
    let err = client
        .require_service_token("bad-token", Some(Service::Books))
        .await
        .unwrap_err();

    assert!(matches!(err, RequestError::InvalidJwt(_)));
    assert_eq!(err.error_schema().map(|s| s.error), Some(ErrorCode::JwtInvalid));
}

#[tokio::test]
async fn test_refresh_loop_survives_failed_iterations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authentication/api/v1/service/jwt/create"))
        .respond_with(ResponseTemplate::new(500).set_body_string("starting up"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_login(&server, "access-1", "refresh-1").await;

    let (client, _) = client(&server);
    let handle = client.spawn_token_refresh_task(Some(Duration::from_millis(50)));

    let mut token = None;
    for _ in 0..100 {
        token = client.access_token().await;
        if token.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(token.as_deref(), Some("access-1"));
    assert!(!handle.is_finished());
    handle.abort();
}

#[tokio::test]
async fn test_refused_verify_call_does_not_blacklist_token() {
    let server = MockServer::start().await;
    mount_login(&server, "access-1", "refresh-1").await;
    Mock::given(method("POST"))
        .and(path("/authentication/api/v1/service/jwt/verify"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"detail": [{"error": "there is no permission for this call"}]})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_service_verify(&server, "users-token", service_payload("users", 600)).await;

    let (client, cache) = client(&server);
    let first = client
        .verify_service_token("users-token", Some(Service::Users))
        .await
        .unwrap();
    assert!(first.is_none());

    let key = verification_cache_key("users-token", TokenBearer::Service);
    assert!(cache.get_bytes(&key).await.unwrap().is_none());

    let second = client
        .verify_service_token("users-token", Some(Service::Users))
        .await
        .unwrap();
    assert_eq!(second.map(|p| p.sub), Some(Service::Users));
}
