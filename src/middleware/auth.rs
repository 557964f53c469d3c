use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

use crate::auth;
use crate::config;
use crate::error::ApiError;
use crate::store::AppState;

/// Why a request failed authentication. Logged server-side only; clients
/// always receive the same generic 401 regardless of the variant.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("missing Authorization header")]
    MissingAuthHeader,
    #[error("malformed Authorization header")]
    MalformedAuthHeader,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
}

/// Bearer/JWT authentication middleware.
///
/// Validates the presented token and injects the resolved [`Identity`] into
/// request extensions. Routes registered outside the protected sub-router
/// (ping, register, token) never pass through here.
pub async fn bearer_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(reject)?;

    let identity = auth::validate_token(&config::config().security, &token).map_err(|e| {
        tracing::debug!("token validation failed: {}", e);
        reject(AuthFailure::InvalidToken)
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Basic authentication middleware: decodes `Basic <base64(user:pass)>` and
/// checks the pair against the credential store.
pub async fn basic_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (username, password) = extract_basic_credentials(&headers).map_err(reject)?;

    let identity = state
        .users
        .authenticate(&username, &password)
        .ok_or_else(|| reject(AuthFailure::InvalidCredentials))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Log the concrete failure, hand the client a generic 401.
fn reject(failure: AuthFailure) -> ApiError {
    tracing::debug!("rejecting request: {}", failure);
    ApiError::unauthorized()
}

fn auth_header(headers: &HeaderMap) -> Result<&str, AuthFailure> {
    let value = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or(AuthFailure::MissingAuthHeader)?;

    value.to_str().map_err(|_| AuthFailure::MalformedAuthHeader)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthFailure> {
    let value = auth_header(headers)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthFailure::MalformedAuthHeader)?;
    if token.trim().is_empty() {
        return Err(AuthFailure::MalformedAuthHeader);
    }

    Ok(token.to_string())
}

fn extract_basic_credentials(headers: &HeaderMap) -> Result<(String, String), AuthFailure> {
    let value = auth_header(headers)?;

    let encoded = value
        .strip_prefix("Basic ")
        .ok_or(AuthFailure::MalformedAuthHeader)?;

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| AuthFailure::MalformedAuthHeader)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthFailure::MalformedAuthHeader)?;

    // Split on the first ':' only - usernames cannot contain colons but
    // passwords may
    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthFailure::MalformedAuthHeader)?;

    Ok((username.to_string(), password.to_string()))
}
