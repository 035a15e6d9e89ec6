//! Request handlers, grouped by resource.
//!
//! Every handler returns `Result<_, (StatusCode, String)>`. Store errors go
//! through [`store_error`], which decides what a client is allowed to see.

mod calculations;
mod equations;
mod library;
mod projects;
mod templates;

pub use calculations::*;
pub use equations::*;
pub use library::*;
pub use projects::*;
pub use templates::*;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use crate::db::DbError;

pub type ApiError = (StatusCode, String);

// ============================================================
// Error Handling
// ============================================================

/// Map a store error onto a response.
///
/// Client mistakes come back with their message. Anything else is logged in
/// full and answered with a generic 500 so internals do not leak.
fn store_error(e: DbError) -> ApiError {
    match e {
        DbError::NotFound { .. } => {
            tracing::debug!("Not found: {}", e);
            (StatusCode::NOT_FOUND, e.to_string())
        }
        DbError::InvalidInput(_) => {
            tracing::warn!("Validation error: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        DbError::Constraint(_) => {
            tracing::warn!("Constraint violation: {}", e);
            (StatusCode::CONFLICT, "Request conflicts with stored data".to_string())
        }
        _ => {
            tracing::error!("Internal error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

fn not_found(entity: &str) -> ApiError {
    (StatusCode::NOT_FOUND, format!("{entity} not found"))
}

/// Turn a delete outcome into 204 or 404.
fn deleted(entity: &str, removed: bool) -> Result<StatusCode, ApiError> {
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(entity))
    }
}

/// `?category=` filter shared by the equation, template and library lists.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_client_statuses() {
        assert_eq!(
            store_error(DbError::not_found("Project", 7)).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            store_error(DbError::InvalidInput("project: name is required".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            store_error(DbError::Constraint("FOREIGN KEY constraint failed".into())).0,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn internal_errors_are_sanitized() {
        let (status, body) = store_error(DbError::LockPoisoned);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal server error");
    }
}
