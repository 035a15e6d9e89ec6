use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EquationSummary, Settings};

/// A reusable blueprint for new projects.
///
/// Projects, task templates and library equations may point at a template.
/// Deleting the template clears those references; it never deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectTemplate {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub is_public: bool,
    pub usage_count: i32,
    pub default_settings: Option<Settings>,
}

/// Input for creating a project template, or replacing every mutable field of one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectTemplateInput {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_by: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub usage_count: i32,
    pub default_settings: Option<Settings>,
}

/// A project template with the task templates and library equations that
/// reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectTemplateWithChildren {
    #[serde(flatten)]
    pub template: ProjectTemplate,
    pub task_templates: Vec<TaskTemplate>,
    pub default_equations: Vec<EquationSummary>,
}

/// A reusable task description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub id: i64,
    pub project_template_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub default_priority: i32,
    pub estimated_duration_hours: i32,
    /// Names of library equations the task needs.
    pub required_equations: Option<Vec<String>>,
    pub default_tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub is_public: bool,
    pub instructions: Option<String>,
}

/// Input for creating a task template, or replacing every mutable field of one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskTemplateInput {
    pub project_template_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub default_priority: i32,
    #[serde(default)]
    pub estimated_duration_hours: i32,
    pub required_equations: Option<Vec<String>>,
    pub default_tags: Option<Vec<String>>,
    pub created_by: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub instructions: Option<String>,
}
