use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};

use super::validate::{
    Validator, CATEGORY_MAX, DESCRIPTION_MAX, LATEX_MAX, NAME_MAX, UNIT_MAX,
    VARIABLE_DESCRIPTION_MAX, VARIABLE_NAME_MAX,
};
use super::{datetime_column, json_column, optional_datetime_column, to_json, Database, DbError, DbResult};
use crate::models::*;

const EQUATION_COLUMNS: &str = "id, name, mathml_content, latex_content, result_unit, is_valid, validation_errors, created_at, modified_at, category, description";

const VARIABLE_COLUMNS: &str = "id, parsed_equation_id, name, display_name, type, exponent, unit, default_value, description, is_required";

fn equation_from_row(row: &Row<'_>) -> rusqlite::Result<ParsedEquation> {
    Ok(ParsedEquation {
        id: row.get(0)?,
        name: row.get(1)?,
        mathml_content: row.get(2)?,
        latex_content: row.get(3)?,
        result_unit: row.get(4)?,
        is_valid: row.get::<_, i32>(5)? != 0,
        validation_errors: json_column(row, 6)?,
        created_at: datetime_column(row, 7)?,
        modified_at: optional_datetime_column(row, 8)?,
        category: row.get(9)?,
        description: row.get(10)?,
    })
}

fn variable_from_row(row: &Row<'_>) -> rusqlite::Result<Variable> {
    Ok(Variable {
        id: row.get(0)?,
        parsed_equation_id: row.get(1)?,
        name: row.get(2)?,
        display_name: row.get(3)?,
        variable_type: VariableType::from_str(&row.get::<_, String>(4)?)
            .unwrap_or(VariableType::Input),
        exponent: row.get(5)?,
        unit: row.get(6)?,
        default_value: row.get(7)?,
        description: row.get(8)?,
        is_required: row.get::<_, i32>(9)? != 0,
    })
}

fn validate_equation(input: &ParsedEquationInput) -> DbResult<()> {
    Validator::new("equation")
        .required("name", &input.name, NAME_MAX)
        .required("mathml_content", &input.mathml_content, usize::MAX)
        .max_len("latex_content", input.latex_content.as_deref(), LATEX_MAX)
        .max_len("result_unit", input.result_unit.as_deref(), UNIT_MAX)
        .max_len("category", input.category.as_deref(), CATEGORY_MAX)
        .max_len("description", input.description.as_deref(), DESCRIPTION_MAX)
        .finish()?;
    input.variables.iter().try_for_each(validate_variable)
}

fn validate_variable(input: &VariableInput) -> DbResult<()> {
    Validator::new("variable")
        .required("name", &input.name, VARIABLE_NAME_MAX)
        .max_len("display_name", Some(input.display_name.as_str()), NAME_MAX)
        .max_len("unit", input.unit.as_deref(), UNIT_MAX)
        .max_len("description", input.description.as_deref(), VARIABLE_DESCRIPTION_MAX)
        .finish()
}

/// Insert one variable on an open connection or transaction.
pub(super) fn insert_variable(
    conn: &Connection,
    parsed_equation_id: Option<i64>,
    input: VariableInput,
) -> DbResult<Variable> {
    let display_name = if input.display_name.is_empty() {
        input.name.clone()
    } else {
        input.display_name
    };

    conn.execute(
        "INSERT INTO variables (parsed_equation_id, name, display_name, type, exponent, unit, default_value, description, is_required)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        (
            parsed_equation_id,
            &input.name,
            &display_name,
            input.variable_type.as_str(),
            input.exponent,
            &input.unit,
            input.default_value,
            &input.description,
            input.is_required,
        ),
    )?;

    Ok(Variable {
        id: conn.last_insert_rowid(),
        parsed_equation_id,
        name: input.name,
        display_name,
        variable_type: input.variable_type,
        exponent: input.exponent,
        unit: input.unit,
        default_value: input.default_value,
        description: input.description,
        is_required: input.is_required,
    })
}

impl Database {
    // ============================================================
    // Parsed equation operations
    // ============================================================

    /// List equations ordered by name, optionally limited to one category.
    pub fn get_all_equations(&self, category: Option<&str>) -> DbResult<Vec<ParsedEquation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {EQUATION_COLUMNS} FROM parsed_equations
             WHERE (?1 IS NULL OR category = ?1) ORDER BY name, id"
        ))?;

        let equations = stmt
            .query_map([category], equation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(equations)
    }

    pub fn get_equation(&self, id: i64) -> DbResult<Option<ParsedEquation>> {
        let conn = self.conn()?;
        let equation = conn
            .query_row(
                &format!("SELECT {EQUATION_COLUMNS} FROM parsed_equations WHERE id = ?"),
                [id],
                equation_from_row,
            )
            .optional()?;
        Ok(equation)
    }

    /// Insert an equation and its variables in one transaction.
    pub fn create_equation(&self, input: ParsedEquationInput) -> DbResult<EquationWithVariables> {
        validate_equation(&input)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = Utc::now();

        tx.execute(
            "INSERT INTO parsed_equations (name, mathml_content, latex_content, result_unit, is_valid,
                 validation_errors, created_at, category, description)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                &input.name,
                &input.mathml_content,
                &input.latex_content,
                &input.result_unit,
                input.is_valid,
                to_json(&input.validation_errors)?,
                now.to_rfc3339(),
                &input.category,
                &input.description,
            ),
        )?;
        let id = tx.last_insert_rowid();

        let variables = input
            .variables
            .into_iter()
            .map(|v| insert_variable(&tx, Some(id), v))
            .collect::<DbResult<Vec<_>>>()?;

        tx.commit()?;

        Ok(EquationWithVariables {
            equation: ParsedEquation {
                id,
                name: input.name,
                mathml_content: input.mathml_content,
                latex_content: input.latex_content,
                result_unit: input.result_unit,
                is_valid: input.is_valid,
                validation_errors: input.validation_errors,
                created_at: now,
                modified_at: None,
                category: input.category,
                description: input.description,
            },
            variables,
        })
    }

    /// Overwrite an equation and swap its variables for the supplied set.
    pub fn replace_equation(
        &self,
        id: i64,
        input: ParsedEquationInput,
    ) -> DbResult<Option<EquationWithVariables>> {
        validate_equation(&input)?;
        let Some(existing) = self.get_equation(id)? else {
            return Ok(None);
        };

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = Utc::now();

        let rows = tx.execute(
            "UPDATE parsed_equations SET name = ?, mathml_content = ?, latex_content = ?, result_unit = ?,
                 is_valid = ?, validation_errors = ?, modified_at = ?, category = ?, description = ?
             WHERE id = ?",
            (
                &input.name,
                &input.mathml_content,
                &input.latex_content,
                &input.result_unit,
                input.is_valid,
                to_json(&input.validation_errors)?,
                now.to_rfc3339(),
                &input.category,
                &input.description,
                id,
            ),
        )?;
        if rows == 0 {
            return Ok(None);
        }
        tx.execute("DELETE FROM variables WHERE parsed_equation_id = ?", [id])?;

        let variables = input
            .variables
            .into_iter()
            .map(|v| insert_variable(&tx, Some(id), v))
            .collect::<DbResult<Vec<_>>>()?;

        tx.commit()?;

        Ok(Some(EquationWithVariables {
            equation: ParsedEquation {
                id,
                name: input.name,
                mathml_content: input.mathml_content,
                latex_content: input.latex_content,
                result_unit: input.result_unit,
                is_valid: input.is_valid,
                validation_errors: input.validation_errors,
                created_at: existing.created_at,
                modified_at: Some(now),
                category: input.category,
                description: input.description,
            },
            variables,
        }))
    }

    /// Delete an equation and its variables. Results computed from it are kept
    /// with their equation link cleared.
    pub fn delete_equation(&self, id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM parsed_equations WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    pub fn get_equation_with_variables(&self, id: i64) -> DbResult<Option<EquationWithVariables>> {
        let Some(equation) = self.get_equation(id)? else {
            return Ok(None);
        };
        let variables = self.get_variables_by_equation(id)?;
        Ok(Some(EquationWithVariables {
            equation,
            variables,
        }))
    }

    pub fn get_validation_result(&self, id: i64) -> DbResult<Option<ValidationResult>> {
        Ok(self.get_equation(id)?.as_ref().map(ValidationResult::from))
    }

    // ============================================================
    // Variable operations
    // ============================================================

    pub fn get_all_variables(&self) -> DbResult<Vec<Variable>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {VARIABLE_COLUMNS} FROM variables ORDER BY id"
        ))?;

        let variables = stmt
            .query_map([], variable_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(variables)
    }

    pub fn get_variables_by_equation(&self, equation_id: i64) -> DbResult<Vec<Variable>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {VARIABLE_COLUMNS} FROM variables WHERE parsed_equation_id = ? ORDER BY id"
        ))?;

        let variables = stmt
            .query_map([equation_id], variable_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(variables)
    }

    pub fn get_variable(&self, id: i64) -> DbResult<Option<Variable>> {
        let conn = self.conn()?;
        let variable = conn
            .query_row(
                &format!("SELECT {VARIABLE_COLUMNS} FROM variables WHERE id = ?"),
                [id],
                variable_from_row,
            )
            .optional()?;
        Ok(variable)
    }

    /// Create a variable, attached to an equation or free-standing.
    pub fn create_variable(
        &self,
        parsed_equation_id: Option<i64>,
        input: VariableInput,
    ) -> DbResult<Variable> {
        validate_variable(&input)?;
        if let Some(equation_id) = parsed_equation_id {
            self.get_equation(equation_id)?
                .ok_or_else(|| DbError::not_found("Equation", equation_id))?;
        }

        let conn = self.conn()?;
        insert_variable(&conn, parsed_equation_id, input)
    }

    /// Overwrite every mutable field of a variable. The equation link is kept.
    pub fn replace_variable(&self, id: i64, input: VariableInput) -> DbResult<Option<Variable>> {
        validate_variable(&input)?;
        let Some(existing) = self.get_variable(id)? else {
            return Ok(None);
        };

        let display_name = if input.display_name.is_empty() {
            input.name.clone()
        } else {
            input.display_name
        };

        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE variables SET name = ?, display_name = ?, type = ?, exponent = ?, unit = ?,
                 default_value = ?, description = ?, is_required = ?
             WHERE id = ?",
            (
                &input.name,
                &display_name,
                input.variable_type.as_str(),
                input.exponent,
                &input.unit,
                input.default_value,
                &input.description,
                input.is_required,
                id,
            ),
        )?;
        if rows == 0 {
            return Ok(None);
        }

        Ok(Some(Variable {
            id,
            parsed_equation_id: existing.parsed_equation_id,
            name: input.name,
            display_name,
            variable_type: input.variable_type,
            exponent: input.exponent,
            unit: input.unit,
            default_value: input.default_value,
            description: input.description,
            is_required: input.is_required,
        }))
    }

    pub fn delete_variable(&self, id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM variables WHERE id = ?", [id])?;
        Ok(rows > 0)
    }
}
