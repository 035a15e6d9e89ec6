use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{deleted, not_found, store_error, ApiError};
use crate::db::Database;
use crate::models::*;

pub async fn list_results(
    State(db): State<Database>,
) -> Result<Json<Vec<CalculationResult>>, ApiError> {
    db.get_all_calculation_results()
        .map(Json)
        .map_err(store_error)
}

pub async fn list_equation_results(
    State(db): State<Database>,
    Path(equation_id): Path<i64>,
) -> Result<Json<Vec<CalculationResult>>, ApiError> {
    db.get_equation(equation_id)
        .map_err(store_error)?
        .ok_or_else(|| not_found("Equation"))?;
    db.get_results_by_equation(equation_id)
        .map(Json)
        .map_err(store_error)
}

/// Fetch a result together with its equation, if that still exists.
pub async fn get_result(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<CalculationResultWithEquation>, ApiError> {
    db.get_calculation_result_with_equation(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Calculation result"))
}

pub async fn create_result(
    State(db): State<Database>,
    Json(input): Json<CalculationResultInput>,
) -> Result<(StatusCode, Json<CalculationResult>), ApiError> {
    db.create_calculation_result(input)
        .map(|r| (StatusCode::CREATED, Json(r)))
        .map_err(store_error)
}

pub async fn delete_result(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted(
        "Calculation result",
        db.delete_calculation_result(id).map_err(store_error)?,
    )
}
