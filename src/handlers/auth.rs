//! Public auth endpoints: user registration and token issuance.

use axum::extract::{Json, State};
use serde::Deserialize;
use tracing::info;

use crate::auth::{self, Identity};
use crate::config;
use crate::error::ApiError;
use crate::store::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    // `userName` kept as an alias for clients of the original wire format
    #[serde(alias = "userName")]
    pub username: String,
    pub password: String,
}

/// POST /api/register - create a user and hand back a token right away.
///
/// 400 when the username is taken or either field is blank.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<String, ApiError> {
    if payload.username.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    let user = state.users.register(&payload.username, &payload.password)?;
    let identity = Identity::new(user.username, user.id);

    let token = auth::issue_token(&config::config().security, &identity)?;
    Ok(token)
}

/// POST /api/token - exchange a username/password pair for a token.
///
/// 401 with a generic body on any credential failure.
pub async fn token(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<String, ApiError> {
    let identity = state
        .users
        .authenticate(&payload.username, &payload.password)
        .ok_or_else(ApiError::unauthorized)?;

    info!(username = %identity.username, "issued token");
    let token = auth::issue_token(&config::config().security, &identity)?;
    Ok(token)
}
