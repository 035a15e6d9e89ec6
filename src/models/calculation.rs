use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ParsedEquation, Settings};

/// The outcome of evaluating an equation.
///
/// `variables` keeps the inputs (and any intermediate values) used for the
/// calculation. The equation link is cleared, not cascaded, when the equation
/// is deleted, so results outlive the equations that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResult {
    pub id: i64,
    pub equation_id: Option<i64>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub calculated_at: DateTime<Utc>,
    pub variables: Option<Settings>,
}

/// Input for recording a calculation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResultInput {
    pub equation_id: Option<i64>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    #[serde(default = "super::default_true")]
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub variables: Option<Settings>,
}

impl Default for CalculationResultInput {
    fn default() -> Self {
        Self {
            equation_id: None,
            value: None,
            unit: None,
            is_valid: true,
            error_message: None,
            variables: None,
        }
    }
}

/// A result with the equation it was computed from, if that still exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResultWithEquation {
    #[serde(flatten)]
    pub result: CalculationResult,
    pub parsed_equation: Option<ParsedEquation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_input_defaults_to_valid() {
        let input: CalculationResultInput =
            serde_json::from_str(r#"{"equation_id":3,"value":12.5}"#).unwrap();

        assert!(input.is_valid);
        assert_eq!(input.equation_id, Some(3));
    }
}
