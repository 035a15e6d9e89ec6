use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Settings, TaskWithCards};

/// An engineering project.
///
/// Projects are the top-level organizational unit. A project owns its tasks
/// (and, through them, task cards); deleting a project removes both. A project
/// may have been started from a [`ProjectTemplate`](super::ProjectTemplate),
/// in which case `project_template_id` points at it until the template is
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    /// Free-form status label (e.g. "Active").
    pub status: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub project_template_id: Option<i64>,
    pub settings: Option<Settings>,
}

/// Input for creating a project, or replacing every mutable field of one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub project_template_id: Option<i64>,
    pub settings: Option<Settings>,
}

/// A project with its tasks and their cards eagerly loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectWithTasks {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<TaskWithCards>,
}
