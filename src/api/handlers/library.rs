use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{deleted, not_found, store_error, ApiError, CategoryQuery};
use crate::db::Database;
use crate::models::*;

pub async fn list_library(
    State(db): State<Database>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<EquationSummary>>, ApiError> {
    db.get_library_equations(query.category.as_deref())
        .map(Json)
        .map_err(store_error)
}

pub async fn get_library_equation(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<EquationSummary>, ApiError> {
    db.get_library_equation(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Library equation"))
}

pub async fn create_library_equation(
    State(db): State<Database>,
    Json(input): Json<EquationSummaryInput>,
) -> Result<(StatusCode, Json<EquationSummary>), ApiError> {
    db.create_library_equation(input)
        .map(|e| (StatusCode::CREATED, Json(e)))
        .map_err(store_error)
}

pub async fn replace_library_equation(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(input): Json<EquationSummaryInput>,
) -> Result<Json<EquationSummary>, ApiError> {
    db.replace_library_equation(id, input)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Library equation"))
}

pub async fn delete_library_equation(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted(
        "Library equation",
        db.delete_library_equation(id).map_err(store_error)?,
    )
}

/// Record that a library equation was picked.
pub async fn use_library_equation(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<EquationSummary>, ApiError> {
    db.record_library_usage(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Library equation"))
}
