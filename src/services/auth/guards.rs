/*
 * Responsibility
 * - Call-site wrappers that require a valid token
 * - The "invalid" verdict becomes RequestError::InvalidJwt with a structured code
 * - Verified claims are recorded on a tracing span
 */
use tracing::field::Empty;
use tracing::{Instrument, Span, info_span};

use crate::error::{ErrorCode, ErrorSchema, RequestError};
use crate::services::auth::payload::{ClientAccessTokenPayload, ServiceAccessTokenPayload};
use crate::services::request::client::ServiceClient;
use crate::services::service::Service;

impl ServiceClient {
    pub async fn require_service_token(
        &self,
        token: &str,
        expected: Option<Service>,
    ) -> Result<ServiceAccessTokenPayload, RequestError> {
        let span = info_span!(
            "verify-service-token",
            iss = Empty,
            sub = Empty,
            exp = Empty,
            iat = Empty,
            role = Empty
        );
        async move {
            let payload = self
                .verify_service_token(token, expected)
                .await?
                .ok_or_else(|| RequestError::InvalidJwt(ErrorSchema::new(ErrorCode::JwtInvalid)))?;
            record_claims(
                &Span::current(),
                &payload.iss,
                payload.sub.as_str(),
                payload.exp,
                payload.iat,
                payload.role.name(),
            );
            Ok(payload)
        }
        .instrument(span)
        .await
    }

    pub async fn require_client_token(
        &self,
        token: &str,
    ) -> Result<ClientAccessTokenPayload, RequestError> {
        let span = info_span!(
            "verify-client-token",
            iss = Empty,
            sub = Empty,
            exp = Empty,
            iat = Empty,
            role = Empty
        );
        async move {
            let payload = self.verify_client_token(token).await?.ok_or_else(|| {
                RequestError::InvalidJwt(ErrorSchema::new(ErrorCode::ClientJwtInvalid))
            })?;
            record_claims(
                &Span::current(),
                &payload.iss,
                &payload.sub,
                payload.exp,
                payload.iat,
                payload.role.name(),
            );
            Ok(payload)
        }
        .instrument(span)
        .await
    }
}

fn record_claims(span: &Span, iss: &str, sub: &str, exp: i64, iat: i64, role: &str) {
    span.record("iss", iss);
    span.record("sub", sub);
    span.record("exp", exp);
    span.record("iat", iat);
    span.record("role", role);
}
