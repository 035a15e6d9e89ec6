use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An entry of the shared equation library.
///
/// Library equations are curated reference formulas (moment capacity,
/// deflection, ...) that projects draw from. `usage_count` and `last_used_at`
/// track how often an entry is picked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationSummary {
    pub id: i64,
    pub project_template_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub mathml_content: String,
    /// Names of the variables the equation uses.
    pub variables: Option<Vec<String>>,
    pub unit: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub usage_count: i32,
}

/// Input for adding an equation to the library, or replacing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationSummaryInput {
    pub project_template_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub mathml_content: String,
    pub variables: Option<Vec<String>>,
    pub unit: Option<String>,
}
