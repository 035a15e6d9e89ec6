use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A board card tracking one slice of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCard {
    pub id: i64,
    pub task_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    /// Display color, e.g. `#ffcc00`.
    pub card_color: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Completion in percent, 0 to 100.
    pub progress_percentage: Option<i32>,
    pub notes: Option<String>,
}

/// Input for creating a task card, or replacing every mutable field of one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskCardInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub card_color: Option<String>,
    pub tags: Option<Vec<String>>,
    pub progress_percentage: Option<i32>,
    pub notes: Option<String>,
}
