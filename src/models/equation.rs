use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An equation captured as MathML.
///
/// The MathML body is opaque to the store. `is_valid` and `validation_errors`
/// record whatever the parser reported when the equation was saved; nothing
/// here recomputes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedEquation {
    pub id: i64,
    pub name: String,
    pub mathml_content: String,
    pub latex_content: Option<String>,
    /// Unit of the equation's output, e.g. `kNm`.
    pub result_unit: Option<String>,
    pub is_valid: bool,
    pub validation_errors: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Input for creating an equation, or replacing it along with its variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedEquationInput {
    pub name: String,
    pub mathml_content: String,
    pub latex_content: Option<String>,
    pub result_unit: Option<String>,
    #[serde(default = "super::default_true")]
    pub is_valid: bool,
    pub validation_errors: Option<Vec<String>>,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Variables owned by the equation. On replace, the existing set is discarded.
    #[serde(default)]
    pub variables: Vec<VariableInput>,
}

impl Default for ParsedEquationInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            mathml_content: String::new(),
            latex_content: None,
            result_unit: None,
            is_valid: true,
            validation_errors: None,
            category: None,
            description: None,
            variables: Vec::new(),
        }
    }
}

/// An equation with its variables eagerly loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationWithVariables {
    #[serde(flatten)]
    pub equation: ParsedEquation,
    pub variables: Vec<Variable>,
}

/// A symbol appearing in an equation.
///
/// `parsed_equation_id` is `None` for free-standing variables such as the
/// demonstration set inserted by the seeder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub id: i64,
    pub parsed_equation_id: Option<i64>,
    /// Identifier as written in the equation, e.g. `fy`.
    pub name: String,
    /// Presentation form, e.g. `f_y`.
    pub display_name: String,
    #[serde(rename = "type")]
    pub variable_type: VariableType,
    pub exponent: Option<f64>,
    pub unit: Option<String>,
    pub default_value: Option<f64>,
    pub description: Option<String>,
    pub is_required: bool,
}

/// The role a variable plays in its equation.
///
/// - `Input`: Supplied by the user before evaluation
/// - `Output`: Produced by the equation
/// - `Function`: A named function such as `sin`
/// - `Constant`: A fixed value such as `π`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    Input,
    Output,
    Function,
    Constant,
}

impl VariableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Function => "function",
            Self::Constant => "constant",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            "function" => Some(Self::Function),
            "constant" => Some(Self::Constant),
            _ => None,
        }
    }
}

/// Input for creating a variable, or replacing every mutable field of one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableInput {
    pub name: String,
    /// Defaults to `name` when empty.
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type")]
    pub variable_type: VariableType,
    pub exponent: Option<f64>,
    pub unit: Option<String>,
    pub default_value: Option<f64>,
    pub description: Option<String>,
    #[serde(default = "super::default_true")]
    pub is_required: bool,
}

impl VariableInput {
    pub fn new(name: impl Into<String>, variable_type: VariableType) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            variable_type,
            exponent: None,
            unit: None,
            default_value: None,
            description: None,
            is_required: true,
        }
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_type_round_trips_through_column_text() {
        for ty in [
            VariableType::Input,
            VariableType::Output,
            VariableType::Function,
            VariableType::Constant,
        ] {
            assert_eq!(VariableType::from_str(ty.as_str()), Some(ty));
        }
        assert_eq!(VariableType::from_str("Input"), None);
    }

    #[test]
    fn equation_input_defaults_to_valid_with_no_variables() {
        let input: ParsedEquationInput =
            serde_json::from_str(r#"{"name":"y","mathml_content":"<math/>"}"#).unwrap();

        assert!(input.is_valid);
        assert!(input.variables.is_empty());
    }

    #[test]
    fn variable_input_uses_type_key() {
        let input: VariableInput =
            serde_json::from_str(r#"{"name":"F","type":"output","unit":"N"}"#).unwrap();

        assert_eq!(input.variable_type, VariableType::Output);
        assert!(input.is_required);
        assert!(input.display_name.is_empty());
    }
}
