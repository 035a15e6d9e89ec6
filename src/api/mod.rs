//! HTTP API served under `/api/v1`.

mod handlers;
mod middleware;

pub use middleware::{auth_middleware, SecurityConfig};

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::db::Database;

/// Router with authentication disabled and permissive CORS.
pub fn create_router(db: Database) -> Router {
    create_router_with_config(db, SecurityConfig::disabled())
}

pub fn create_router_with_config(db: Database, security: SecurityConfig) -> Router {
    let api = Router::new()
        // Projects
        .route("/projects", get(handlers::list_projects).post(handlers::create_project))
        .route(
            "/projects/{id}",
            get(handlers::get_project)
                .put(handlers::replace_project)
                .delete(handlers::delete_project),
        )
        .route(
            "/projects/{id}/tasks",
            get(handlers::list_project_tasks).post(handlers::create_task),
        )
        // Tasks and cards
        .route(
            "/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::replace_task)
                .delete(handlers::delete_task),
        )
        .route(
            "/tasks/{id}/cards",
            get(handlers::list_task_cards).post(handlers::create_task_card),
        )
        .route(
            "/cards/{id}",
            get(handlers::get_task_card)
                .put(handlers::replace_task_card)
                .delete(handlers::delete_task_card),
        )
        // Equations
        .route("/equations", get(handlers::list_equations).post(handlers::create_equation))
        .route(
            "/equations/{id}",
            get(handlers::get_equation)
                .put(handlers::replace_equation)
                .delete(handlers::delete_equation),
        )
        .route(
            "/equations/{id}/variables",
            get(handlers::list_equation_variables).post(handlers::create_equation_variable),
        )
        .route("/equations/{id}/validation", get(handlers::get_equation_validation))
        .route("/equations/{id}/results", get(handlers::list_equation_results))
        // Variables
        .route("/variables", get(handlers::list_variables).post(handlers::create_variable))
        .route(
            "/variables/{id}",
            get(handlers::get_variable)
                .put(handlers::replace_variable)
                .delete(handlers::delete_variable),
        )
        // Calculation results
        .route("/results", get(handlers::list_results).post(handlers::create_result))
        .route(
            "/results/{id}",
            get(handlers::get_result).delete(handlers::delete_result),
        )
        // Templates
        .route(
            "/templates/projects",
            get(handlers::list_project_templates).post(handlers::create_project_template),
        )
        .route(
            "/templates/projects/{id}",
            get(handlers::get_project_template)
                .put(handlers::replace_project_template)
                .delete(handlers::delete_project_template),
        )
        .route(
            "/templates/tasks",
            get(handlers::list_task_templates).post(handlers::create_task_template),
        )
        .route(
            "/templates/tasks/{id}",
            get(handlers::get_task_template)
                .put(handlers::replace_task_template)
                .delete(handlers::delete_task_template),
        )
        // Equation library
        .route("/library", get(handlers::list_library).post(handlers::create_library_equation))
        .route(
            "/library/{id}",
            get(handlers::get_library_equation)
                .put(handlers::replace_library_equation)
                .delete(handlers::delete_library_equation),
        )
        .route("/library/{id}/use", post(handlers::use_library_equation))
        .route_layer(from_fn_with_state(security.clone(), auth_middleware))
        // Health stays reachable without a token
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security.cors_layer()),
        )
        .with_state(db)
}
