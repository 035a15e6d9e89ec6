use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ParsedEquation, Settings};

/// Validation state of a piece of MathML.
///
/// This is a report, not a validator: the store never inspects MathML. It is
/// assembled from what the parser recorded on a [`ParsedEquation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Option<Vec<String>>,
    pub warnings: Option<Vec<String>>,
    pub validated_content: Option<String>,
    pub validated_at: DateTime<Utc>,
    pub validation_type: Option<String>,
    pub validation_details: Option<Settings>,
    pub suggestions: Option<String>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl From<&ParsedEquation> for ValidationResult {
    fn from(equation: &ParsedEquation) -> Self {
        let error_count = equation.validation_errors.as_ref().map_or(0, Vec::len);
        Self {
            is_valid: equation.is_valid,
            errors: equation.validation_errors.clone(),
            warnings: None,
            validated_content: Some(equation.mathml_content.clone()),
            validated_at: equation.modified_at.unwrap_or(equation.created_at),
            validation_type: Some("MathML".to_string()),
            validation_details: None,
            suggestions: None,
            error_count,
            warning_count: 0,
        }
    }
}
