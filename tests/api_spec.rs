use axum::http::StatusCode;
use axum_test::TestServer;
use mathml_parser::api::{create_router, create_router_with_config, SecurityConfig};
use mathml_parser::db::Database;
use mathml_parser::models::*;
use serde_json::{json, Value};

fn setup() -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let app = create_router(db);
    TestServer::new(app).expect("Failed to create test server")
}

async fn create_test_project(server: &TestServer) -> Project {
    server
        .post("/api/v1/projects")
        .json(&ProjectInput {
            name: "Test Project".to_string(),
            ..Default::default()
        })
        .await
        .json::<Project>()
}

async fn create_test_task(server: &TestServer, project_id: i64) -> Task {
    server
        .post(&format!("/api/v1/projects/{}/tasks", project_id))
        .json(&TaskInput {
            name: "Test Task".to_string(),
            ..Default::default()
        })
        .await
        .json::<Task>()
}

async fn create_test_equation(server: &TestServer) -> EquationWithVariables {
    server
        .post("/api/v1/equations")
        .json(&json!({
            "name": "Moment capacity",
            "mathml_content": "<math><mi>M</mi></math>",
            "category": "Structural",
            "variables": [
                { "name": "Mn", "type": "output", "unit": "kNm" },
                { "name": "fy", "type": "input", "unit": "MPa" },
                { "name": "Sx", "type": "input" }
            ]
        }))
        .await
        .json::<EquationWithVariables>()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();

        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }
}

mod projects {
    use super::*;

    #[tokio::test]
    async fn create_returns_201() {
        let server = setup();

        let response = server
            .post("/api/v1/projects")
            .json(&json!({ "name": "Footbridge", "status": "Active" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let project: Project = response.json();
        assert_eq!(project.name, "Footbridge");
        assert_eq!(project.status.as_deref(), Some("Active"));
    }

    #[tokio::test]
    async fn create_rejects_missing_name_with_400() {
        let server = setup();

        let response = server
            .post("/api/v1/projects")
            .json(&json!({ "name": "   " }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("name is required"));
    }

    #[tokio::test]
    async fn get_includes_tasks_and_cards() {
        let server = setup();
        let project = create_test_project(&server).await;
        let task = create_test_task(&server, project.id).await;
        server
            .post(&format!("/api/v1/tasks/{}/cards", task.id))
            .json(&json!({ "title": "Check welds", "progress_percentage": 25 }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get(&format!("/api/v1/projects/{}", project.id)).await;

        response.assert_status_ok();
        let loaded: ProjectWithTasks = response.json();
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].task_cards[0].title, "Check welds");
    }

    #[tokio::test]
    async fn get_unknown_returns_404() {
        let server = setup();

        server
            .get("/api/v1/projects/999")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn put_replaces_the_project() {
        let server = setup();
        let project = create_test_project(&server).await;

        let response = server
            .put(&format!("/api/v1/projects/{}", project.id))
            .json(&json!({ "name": "Renamed" }))
            .await;

        response.assert_status_ok();
        let replaced: Project = response.json();
        assert_eq!(replaced.name, "Renamed");
        assert!(replaced.modified_at.is_some());
    }

    #[tokio::test]
    async fn put_unknown_returns_404() {
        let server = setup();

        server
            .put("/api/v1/projects/999")
            .json(&json!({ "name": "Nobody" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_returns_204_then_404() {
        let server = setup();
        let project = create_test_project(&server).await;
        let url = format!("/api/v1/projects/{}", project.id);

        server.delete(&url).await.assert_status(StatusCode::NO_CONTENT);
        server.delete(&url).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_template_reference_returns_404() {
        let server = setup();

        server
            .post("/api/v1/projects")
            .json(&json!({ "name": "Templated", "project_template_id": 77 }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn replace_with_unknown_template_returns_404() {
        let server = setup();
        let project = create_test_project(&server).await;

        server
            .put(&format!("/api/v1/projects/{}", project.id))
            .json(&json!({ "name": "Templated", "project_template_id": 999 }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

mod tasks {
    use super::*;

    #[tokio::test]
    async fn lists_tasks_of_a_project() {
        let server = setup();
        let project = create_test_project(&server).await;
        create_test_task(&server, project.id).await;

        let response = server
            .get(&format!("/api/v1/projects/{}/tasks", project.id))
            .await;

        response.assert_status_ok();
        let tasks: Vec<Task> = response.json();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].project_id, project.id);
    }

    #[tokio::test]
    async fn listing_tasks_of_unknown_project_returns_404() {
        let server = setup();

        server
            .get("/api/v1/projects/42/tasks")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn creating_task_under_unknown_project_returns_404() {
        let server = setup();

        server
            .post("/api/v1/projects/42/tasks")
            .json(&json!({ "name": "Stray" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_a_project_removes_its_tasks() {
        let server = setup();
        let project = create_test_project(&server).await;
        let task = create_test_task(&server, project.id).await;

        server
            .delete(&format!("/api/v1/projects/{}", project.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get(&format!("/api/v1/tasks/{}", task.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

mod task_cards {
    use super::*;

    #[tokio::test]
    async fn rejects_progress_over_100() {
        let server = setup();
        let project = create_test_project(&server).await;
        let task = create_test_task(&server, project.id).await;

        server
            .post(&format!("/api/v1/tasks/{}/cards", task.id))
            .json(&json!({ "title": "Overdone", "progress_percentage": 150 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn replace_and_delete_a_card() {
        let server = setup();
        let project = create_test_project(&server).await;
        let task = create_test_task(&server, project.id).await;
        let card: TaskCard = server
            .post(&format!("/api/v1/tasks/{}/cards", task.id))
            .json(&json!({ "title": "Draft" }))
            .await
            .json();

        let replaced: TaskCard = server
            .put(&format!("/api/v1/cards/{}", card.id))
            .json(&json!({ "title": "Final", "tags": ["review"] }))
            .await
            .json();
        assert_eq!(replaced.title, "Final");
        assert_eq!(replaced.tags, Some(vec!["review".to_string()]));

        server
            .delete(&format!("/api/v1/cards/{}", card.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let cards: Vec<TaskCard> = server
            .get(&format!("/api/v1/tasks/{}/cards", task.id))
            .await
            .json();
        assert!(cards.is_empty());
    }
}

mod equations {
    use super::*;

    #[tokio::test]
    async fn create_returns_equation_with_variables() {
        let server = setup();

        let created = create_test_equation(&server).await;

        assert_eq!(created.variables.len(), 3);
        assert!(created.equation.is_valid);

        let response = server
            .get(&format!("/api/v1/equations/{}", created.equation.id))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["name"], "Moment capacity");
        assert_eq!(body["variables"][0]["type"], "output");
    }

    #[tokio::test]
    async fn list_filters_by_category() {
        let server = setup();
        create_test_equation(&server).await;
        server
            .post("/api/v1/equations")
            .json(&json!({ "name": "Pipe flow", "mathml_content": "<math/>", "category": "Hydraulic" }))
            .await
            .assert_status(StatusCode::CREATED);

        let all: Vec<ParsedEquation> = server.get("/api/v1/equations").await.json();
        assert_eq!(all.len(), 2);

        let hydraulic: Vec<ParsedEquation> = server
            .get("/api/v1/equations")
            .add_query_param("category", "Hydraulic")
            .await
            .json();
        assert_eq!(hydraulic.len(), 1);
        assert_eq!(hydraulic[0].name, "Pipe flow");
    }

    #[tokio::test]
    async fn validation_reports_stored_flags() {
        let server = setup();
        let created: EquationWithVariables = server
            .post("/api/v1/equations")
            .json(&json!({
                "name": "Broken",
                "mathml_content": "<math><mrow>",
                "is_valid": false,
                "validation_errors": ["unclosed mrow"]
            }))
            .await
            .json();

        let response = server
            .get(&format!("/api/v1/equations/{}/validation", created.equation.id))
            .await;

        response.assert_status_ok();
        let validation: ValidationResult = response.json();
        assert!(!validation.is_valid);
        assert_eq!(validation.error_count, 1);
        assert_eq!(validation.validation_type.as_deref(), Some("MathML"));
    }

    #[tokio::test]
    async fn variables_can_be_added_to_an_equation() {
        let server = setup();
        let created = create_test_equation(&server).await;

        server
            .post(&format!("/api/v1/equations/{}/variables", created.equation.id))
            .json(&json!({ "name": "phi", "type": "constant", "default_value": 0.9 }))
            .await
            .assert_status(StatusCode::CREATED);

        let variables: Vec<Variable> = server
            .get(&format!("/api/v1/equations/{}/variables", created.equation.id))
            .await
            .json();
        assert_eq!(variables.len(), 4);
    }

    #[tokio::test]
    async fn delete_removes_variables() {
        let server = setup();
        let created = create_test_equation(&server).await;
        let variable_id = created.variables[0].id;

        server
            .delete(&format!("/api/v1/equations/{}", created.equation.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get(&format!("/api/v1/variables/{}", variable_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn validation_of_unknown_equation_returns_404() {
        let server = setup();

        server
            .get("/api/v1/equations/5/validation")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

mod variables {
    use super::*;

    #[tokio::test]
    async fn creates_standalone_variables() {
        let server = setup();

        let response = server
            .post("/api/v1/variables")
            .json(&json!({ "name": "E", "display_name": "E_s", "type": "constant", "unit": "GPa" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let variable: Variable = response.json();
        assert!(variable.parsed_equation_id.is_none());
        assert_eq!(variable.display_name, "E_s");

        let all: Vec<Variable> = server.get("/api/v1/variables").await.json();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn rejects_unknown_type() {
        let server = setup();

        let response = server
            .post("/api/v1/variables")
            .json(&json!({ "name": "q", "type": "mystery" }))
            .await;

        assert!(response.status_code().is_client_error());
    }
}

mod results {
    use super::*;

    #[tokio::test]
    async fn stores_variables_map_and_links_equation() {
        let server = setup();
        let equation = create_test_equation(&server).await;

        let created: CalculationResult = server
            .post("/api/v1/results")
            .json(&json!({
                "equation_id": equation.equation.id,
                "value": 425.0,
                "unit": "kNm",
                "variables": { "x": 10.0, "y": 42.5, "unit_x": "m", "unit_y": "kN" }
            }))
            .await
            .json();

        let response = server.get(&format!("/api/v1/results/{}", created.id)).await;
        response.assert_status_ok();
        let loaded: CalculationResultWithEquation = response.json();
        let variables = loaded.result.variables.expect("Variables missing");
        assert_eq!(variables["x"].as_f64(), Some(10.0));
        assert_eq!(variables["unit_y"].as_str(), Some("kN"));
        assert_eq!(
            loaded.parsed_equation.map(|e| e.id),
            Some(equation.equation.id)
        );

        let by_equation: Vec<CalculationResult> = server
            .get(&format!("/api/v1/equations/{}/results", equation.equation.id))
            .await
            .json();
        assert_eq!(by_equation.len(), 1);
    }

    #[tokio::test]
    async fn result_outlives_its_equation() {
        let server = setup();
        let equation = create_test_equation(&server).await;
        let created: CalculationResult = server
            .post("/api/v1/results")
            .json(&json!({ "equation_id": equation.equation.id, "value": 1.0 }))
            .await
            .json();

        server
            .delete(&format!("/api/v1/equations/{}", equation.equation.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let loaded: CalculationResultWithEquation = server
            .get(&format!("/api/v1/results/{}", created.id))
            .await
            .json();
        assert!(loaded.result.equation_id.is_none());
        assert!(loaded.parsed_equation.is_none());
    }

    #[tokio::test]
    async fn delete_returns_204() {
        let server = setup();
        let created: CalculationResult = server
            .post("/api/v1/results")
            .json(&json!({ "value": 2.0 }))
            .await
            .json();

        server
            .delete(&format!("/api/v1/results/{}", created.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/results/{}", created.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

mod templates {
    use super::*;

    #[tokio::test]
    async fn project_template_includes_children() {
        let server = setup();
        let template: ProjectTemplate = server
            .post("/api/v1/templates/projects")
            .json(&json!({
                "name": "Steel frame",
                "category": "Structural",
                "default_settings": { "units": "SI", "safety_factor": 1.5, "code": "AISC" }
            }))
            .await
            .json();

        server
            .post("/api/v1/templates/tasks")
            .json(&json!({ "name": "Column check", "project_template_id": template.id, "default_priority": 2 }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(&format!("/api/v1/templates/projects/{}", template.id))
            .await;

        response.assert_status_ok();
        let loaded: ProjectTemplateWithChildren = response.json();
        assert_eq!(loaded.task_templates.len(), 1);
        let settings = loaded.template.default_settings.expect("Settings missing");
        assert_eq!(settings["safety_factor"].as_f64(), Some(1.5));
    }

    #[tokio::test]
    async fn lists_filter_by_category() {
        let server = setup();
        for (name, category) in [("Frame", "Structural"), ("Culvert", "Hydraulic")] {
            server
                .post("/api/v1/templates/projects")
                .json(&json!({ "name": name, "category": category }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let structural: Vec<ProjectTemplate> = server
            .get("/api/v1/templates/projects")
            .add_query_param("category", "Structural")
            .await
            .json();
        assert_eq!(structural.len(), 1);
        assert_eq!(structural[0].name, "Frame");
    }

    #[tokio::test]
    async fn task_template_with_unknown_parent_returns_404() {
        let server = setup();

        server
            .post("/api/v1/templates/tasks")
            .json(&json!({ "name": "Orphan", "project_template_id": 404 }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn task_template_replace_and_delete() {
        let server = setup();
        let created: TaskTemplate = server
            .post("/api/v1/templates/tasks")
            .json(&json!({ "name": "Draft" }))
            .await
            .json();
        let url = format!("/api/v1/templates/tasks/{}", created.id);

        let replaced: TaskTemplate = server
            .put(&url)
            .json(&json!({ "name": "Reviewed", "estimated_duration_hours": 3 }))
            .await
            .json();
        assert_eq!(replaced.estimated_duration_hours, 3);

        server.delete(&url).await.assert_status(StatusCode::NO_CONTENT);
        server.get(&url).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn task_template_replace_with_unknown_parent_returns_404() {
        let server = setup();
        let created: TaskTemplate = server
            .post("/api/v1/templates/tasks")
            .json(&json!({ "name": "Draft" }))
            .await
            .json();

        server
            .put(&format!("/api/v1/templates/tasks/{}", created.id))
            .json(&json!({ "name": "Draft", "project_template_id": 999 }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

mod library {
    use super::*;

    #[tokio::test]
    async fn use_bumps_usage_count() {
        let server = setup();
        let entry: EquationSummary = server
            .post("/api/v1/library")
            .json(&json!({
                "name": "Deflection",
                "category": "Deflection",
                "mathml_content": "<math/>",
                "unit": "mm"
            }))
            .await
            .json();

        let response = server
            .post(&format!("/api/v1/library/{}/use", entry.id))
            .await;

        response.assert_status_ok();
        let used: EquationSummary = response.json();
        assert_eq!(used.usage_count, 1);
        assert!(used.last_used_at.is_some());
    }

    #[tokio::test]
    async fn use_of_unknown_entry_returns_404() {
        let server = setup();

        server
            .post("/api/v1/library/3/use")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn replace_with_unknown_template_returns_404() {
        let server = setup();
        let entry: EquationSummary = server
            .post("/api/v1/library")
            .json(&json!({ "name": "Moment", "category": "MomentCapacity", "mathml_content": "<math/>" }))
            .await
            .json();

        server
            .put(&format!("/api/v1/library/{}", entry.id))
            .json(&json!({
                "name": "Moment",
                "category": "MomentCapacity",
                "mathml_content": "<math/>",
                "project_template_id": 999
            }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_filters_by_category() {
        let server = setup();
        for (name, category) in [("Moment", "MomentCapacity"), ("Shear", "ShearCapacity")] {
            server
                .post("/api/v1/library")
                .json(&json!({ "name": name, "category": category, "mathml_content": "<math/>" }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let shear: Vec<EquationSummary> = server
            .get("/api/v1/library")
            .add_query_param("category", "ShearCapacity")
            .await
            .json();
        assert_eq!(shear.len(), 1);
        assert_eq!(shear[0].name, "Shear");
    }
}

mod seeded_store {
    use super::*;

    #[tokio::test]
    async fn serves_demonstration_data() {
        let db = Database::open_memory().expect("Failed to create database");
        db.migrate().expect("Failed to migrate");
        db.seed().expect("Failed to seed");
        let server = TestServer::new(create_router(db)).expect("Failed to create test server");

        let library: Vec<EquationSummary> = server.get("/api/v1/library").await.json();
        assert_eq!(library.len(), 3);

        let templates: Vec<ProjectTemplate> = server.get("/api/v1/templates/projects").await.json();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "Steel Beam Analysis");
    }
}

mod authentication {
    use super::*;

    fn secured_server() -> TestServer {
        let db = Database::open_memory().expect("Failed to create database");
        db.migrate().expect("Failed to migrate");
        let app = create_router_with_config(db, SecurityConfig::with_api_key("test-key"));
        TestServer::new(app).expect("Failed to create test server")
    }

    #[tokio::test]
    async fn rejects_requests_without_token() {
        let server = secured_server();

        server
            .get("/api/v1/projects")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn accepts_requests_with_token() {
        let server = secured_server();

        server
            .get("/api/v1/projects")
            .add_header("Authorization", "Bearer test-key")
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn health_is_open() {
        let server = secured_server();

        server.get("/api/v1/health").await.assert_status_ok();
    }
}
