//! Payload validation, expressed as an explicit function rather than any
//! attribute or reflection mechanism. Callers get the full set of field
//! errors back, never just the first one.

use serde::Serialize;

use crate::handlers::todos::TodoRequest;

/// One field-level validation failure, serialized as `{property, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub property: String,
    pub error: String,
}

impl FieldError {
    pub fn new(property: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            error: error.into(),
        }
    }
}

/// A todo payload that passed validation.
#[derive(Debug, Clone)]
pub struct ValidTodo {
    pub title: String,
    pub is_completed: bool,
}

/// Validate an incoming todo payload. Runs before any store mutation; on
/// failure the caller must not touch the store.
pub fn validate_todo(payload: &TodoRequest) -> Result<ValidTodo, Vec<FieldError>> {
    let mut errors = Vec::new();

    match payload.title.as_deref().map(str::trim) {
        None | Some("") => errors.push(FieldError::new("title", "Title required")),
        Some(title) if title.chars().count() < 3 => {
            errors.push(FieldError::new(
                "title",
                "Title must be at least 3 characters",
            ));
        }
        Some(_) => {}
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidTodo {
        // The match above rejected None, so the default is unreachable
        title: payload.title.clone().unwrap_or_default(),
        is_completed: payload.is_completed,
    })
}
