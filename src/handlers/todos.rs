//! Protected todo CRUD handlers.
//!
//! Every handler receives the [`Identity`] resolved by the auth middleware
//! and passes it explicitly to the store, so nothing here can read or touch
//! another user's todos.

use axum::{
    extract::{Extension, Json, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::api::format::{todo_to_api, todos_to_api};
use crate::auth::Identity;
use crate::error::ApiError;
use crate::store::AppState;
use crate::validation::validate_todo;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRequest {
    // Clients may echo an id in the body; unknown fields are ignored and the
    // path parameter wins
    pub title: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

/// GET /api/todos - the caller's todos, insertion order.
pub async fn todos_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> impl IntoResponse {
    let todos = state.todos.get_all(&identity);
    Json(todos_to_api(&todos))
}

/// GET /api/todos/:id - 404 covers both "no such id" and "not yours".
pub async fn todo_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(id, "received get request");

    let todo = state
        .todos
        .get_by_id(&identity, id)
        .ok_or_else(|| ApiError::not_found("not found"))?;

    Ok(Json(todo_to_api(&todo)))
}

/// POST /api/todos - validate, then create: 201 with a Location header and
/// an empty body, or 400 with the full set of field errors.
pub async fn todos_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<TodoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let valid = validate_todo(&payload).map_err(|errors| {
        debug!(?errors, "invalid create request");
        ApiError::validation_error(errors)
    })?;

    let id = state
        .todos
        .create(&identity, valid.title, valid.is_completed);
    info!(id, "created new todo");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/todos/{}", id))],
    ))
}

/// PUT /api/todos/:id - validate, then replace in place. Responds 202 even
/// when no owned todo matched; the update is silently a no-op then.
pub async fn todo_put(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<u64>,
    Json(payload): Json<TodoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let valid = validate_todo(&payload).map_err(|errors| {
        debug!(?errors, "invalid update request");
        ApiError::validation_error(errors)
    })?;

    let updated = state
        .todos
        .update(&identity, id, valid.title, valid.is_completed);
    if updated {
        info!(id, "updated todo");
    } else {
        debug!(id, "update matched no owned todo");
    }

    Ok(StatusCode::ACCEPTED)
}

/// DELETE /api/todos/:id - 204 on success, 404 when nothing matched.
pub async fn todo_delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    if state.todos.delete(&identity, id) {
        info!(id, "deleted todo");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("not found"))
    }
}
