use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{deleted, not_found, store_error, ApiError, CategoryQuery};
use crate::db::Database;
use crate::models::*;

// ============================================================
// Parsed equations
// ============================================================

pub async fn list_equations(
    State(db): State<Database>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<ParsedEquation>>, ApiError> {
    db.get_all_equations(query.category.as_deref())
        .map(Json)
        .map_err(store_error)
}

pub async fn get_equation(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<EquationWithVariables>, ApiError> {
    db.get_equation_with_variables(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Equation"))
}

pub async fn create_equation(
    State(db): State<Database>,
    Json(input): Json<ParsedEquationInput>,
) -> Result<(StatusCode, Json<EquationWithVariables>), ApiError> {
    db.create_equation(input)
        .map(|e| (StatusCode::CREATED, Json(e)))
        .map_err(store_error)
}

pub async fn replace_equation(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(input): Json<ParsedEquationInput>,
) -> Result<Json<EquationWithVariables>, ApiError> {
    db.replace_equation(id, input)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Equation"))
}

pub async fn delete_equation(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted("Equation", db.delete_equation(id).map_err(store_error)?)
}

pub async fn get_equation_validation(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<ValidationResult>, ApiError> {
    db.get_validation_result(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Equation"))
}

// ============================================================
// Variables
// ============================================================

pub async fn list_variables(State(db): State<Database>) -> Result<Json<Vec<Variable>>, ApiError> {
    db.get_all_variables().map(Json).map_err(store_error)
}

pub async fn list_equation_variables(
    State(db): State<Database>,
    Path(equation_id): Path<i64>,
) -> Result<Json<Vec<Variable>>, ApiError> {
    db.get_equation(equation_id)
        .map_err(store_error)?
        .ok_or_else(|| not_found("Equation"))?;
    db.get_variables_by_equation(equation_id)
        .map(Json)
        .map_err(store_error)
}

/// Create a variable not attached to any equation.
pub async fn create_variable(
    State(db): State<Database>,
    Json(input): Json<VariableInput>,
) -> Result<(StatusCode, Json<Variable>), ApiError> {
    db.create_variable(None, input)
        .map(|v| (StatusCode::CREATED, Json(v)))
        .map_err(store_error)
}

pub async fn create_equation_variable(
    State(db): State<Database>,
    Path(equation_id): Path<i64>,
    Json(input): Json<VariableInput>,
) -> Result<(StatusCode, Json<Variable>), ApiError> {
    db.create_variable(Some(equation_id), input)
        .map(|v| (StatusCode::CREATED, Json(v)))
        .map_err(store_error)
}

pub async fn get_variable(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Variable>, ApiError> {
    db.get_variable(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Variable"))
}

pub async fn replace_variable(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(input): Json<VariableInput>,
) -> Result<Json<Variable>, ApiError> {
    db.replace_variable(id, input)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Variable"))
}

pub async fn delete_variable(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted("Variable", db.delete_variable(id).map_err(store_error)?)
}
