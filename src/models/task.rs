use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TaskCard;

/// A unit of work within a project.
///
/// Tasks belong to exactly one project and are removed with it. Status and
/// priority are free-form labels; nothing in the store interprets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
}

/// Input for creating a task, or replacing every mutable field of one.
///
/// The owning project comes from the call site, not the input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskInput {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
}

/// A task with its cards, used for detailed responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithCards {
    #[serde(flatten)]
    pub task: Task,
    pub task_cards: Vec<TaskCard>,
}
