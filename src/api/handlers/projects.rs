use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{deleted, not_found, store_error, ApiError};
use crate::db::Database;
use crate::models::*;

// ============================================================
// Projects
// ============================================================

pub async fn list_projects(State(db): State<Database>) -> Result<Json<Vec<Project>>, ApiError> {
    db.get_all_projects().map(Json).map_err(store_error)
}

pub async fn get_project(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectWithTasks>, ApiError> {
    db.get_project_with_tasks(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Project"))
}

pub async fn create_project(
    State(db): State<Database>,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    db.create_project(input)
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(store_error)
}

pub async fn replace_project(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Project>, ApiError> {
    db.replace_project(id, input)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Project"))
}

pub async fn delete_project(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted("Project", db.delete_project(id).map_err(store_error)?)
}

// ============================================================
// Tasks
// ============================================================

pub async fn list_project_tasks(
    State(db): State<Database>,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<Task>>, ApiError> {
    db.get_project(project_id)
        .map_err(store_error)?
        .ok_or_else(|| not_found("Project"))?;
    db.get_tasks_by_project(project_id)
        .map(Json)
        .map_err(store_error)
}

pub async fn create_task(
    State(db): State<Database>,
    Path(project_id): Path<i64>,
    Json(input): Json<TaskInput>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    db.create_task(project_id, input)
        .map(|t| (StatusCode::CREATED, Json(t)))
        .map_err(store_error)
}

pub async fn get_task(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<TaskWithCards>, ApiError> {
    db.get_task_with_cards(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Task"))
}

pub async fn replace_task(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(input): Json<TaskInput>,
) -> Result<Json<Task>, ApiError> {
    db.replace_task(id, input)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Task"))
}

pub async fn delete_task(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted("Task", db.delete_task(id).map_err(store_error)?)
}

// ============================================================
// Task cards
// ============================================================

pub async fn list_task_cards(
    State(db): State<Database>,
    Path(task_id): Path<i64>,
) -> Result<Json<Vec<TaskCard>>, ApiError> {
    db.get_task(task_id)
        .map_err(store_error)?
        .ok_or_else(|| not_found("Task"))?;
    db.get_task_cards_by_task(task_id)
        .map(Json)
        .map_err(store_error)
}

pub async fn create_task_card(
    State(db): State<Database>,
    Path(task_id): Path<i64>,
    Json(input): Json<TaskCardInput>,
) -> Result<(StatusCode, Json<TaskCard>), ApiError> {
    db.create_task_card(task_id, input)
        .map(|c| (StatusCode::CREATED, Json(c)))
        .map_err(store_error)
}

pub async fn get_task_card(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<TaskCard>, ApiError> {
    db.get_task_card(id)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Task card"))
}

pub async fn replace_task_card(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(input): Json<TaskCardInput>,
) -> Result<Json<TaskCard>, ApiError> {
    db.replace_task_card(id, input)
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| not_found("Task card"))
}

pub async fn delete_task_card(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted("Task card", db.delete_task_card(id).map_err(store_error)?)
}
