use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{deleted, not_found, store_error, ApiError, CategoryQuery};
use crate::db::Database;
use crate::models::*;

// ============================================================
// Project templates
// ============================================================

pub async fn list_project_templates(
    State(db): State<Database>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<ProjectTemplate>>, ApiError> {
    db.get_all_project_templates(query.category.as_deref())
        .map(Json)
        .map_err(store_error)
}

pub async fn get_project_template(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectTemplateWithChildren>, ApiError> {
    db.get_project_template_with_children(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Project template"))
}

pub async fn create_project_template(
    State(db): State<Database>,
    Json(input): Json<ProjectTemplateInput>,
) -> Result<(StatusCode, Json<ProjectTemplate>), ApiError> {
    db.create_project_template(input)
        .map(|t| (StatusCode::CREATED, Json(t)))
        .map_err(store_error)
}

pub async fn replace_project_template(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(input): Json<ProjectTemplateInput>,
) -> Result<Json<ProjectTemplate>, ApiError> {
    db.replace_project_template(id, input)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Project template"))
}

pub async fn delete_project_template(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted(
        "Project template",
        db.delete_project_template(id).map_err(store_error)?,
    )
}

// ============================================================
// Task templates
// ============================================================

pub async fn list_task_templates(
    State(db): State<Database>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<TaskTemplate>>, ApiError> {
    db.get_all_task_templates(query.category.as_deref())
        .map(Json)
        .map_err(store_error)
}

pub async fn get_task_template(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<TaskTemplate>, ApiError> {
    db.get_task_template(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Task template"))
}

pub async fn create_task_template(
    State(db): State<Database>,
    Json(input): Json<TaskTemplateInput>,
) -> Result<(StatusCode, Json<TaskTemplate>), ApiError> {
    db.create_task_template(input)
        .map(|t| (StatusCode::CREATED, Json(t)))
        .map_err(store_error)
}

pub async fn replace_task_template(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(input): Json<TaskTemplateInput>,
) -> Result<Json<TaskTemplate>, ApiError> {
    db.replace_task_template(id, input)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Task template"))
}

pub async fn delete_task_template(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted("Task template", db.delete_task_template(id).map_err(store_error)?)
}
