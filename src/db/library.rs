use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};

use super::validate::{Validator, CATEGORY_MAX, DESCRIPTION_MAX, NAME_MAX, UNIT_MAX};
use super::{datetime_column, json_column, optional_datetime_column, to_json, Database, DbError, DbResult};
use crate::models::*;

const LIBRARY_COLUMNS: &str = "id, project_template_id, name, description, category, mathml_content, variables, unit, created_at, last_used_at, usage_count";

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<EquationSummary> {
    Ok(EquationSummary {
        id: row.get(0)?,
        project_template_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        mathml_content: row.get(5)?,
        variables: json_column(row, 6)?,
        unit: row.get(7)?,
        created_at: datetime_column(row, 8)?,
        last_used_at: optional_datetime_column(row, 9)?,
        usage_count: row.get(10)?,
    })
}

fn validate_summary(input: &EquationSummaryInput) -> DbResult<()> {
    Validator::new("library equation")
        .required("name", &input.name, NAME_MAX)
        .required("category", &input.category, CATEGORY_MAX)
        .required("mathml_content", &input.mathml_content, usize::MAX)
        .max_len("description", input.description.as_deref(), DESCRIPTION_MAX)
        .max_len("unit", input.unit.as_deref(), UNIT_MAX)
        .finish()
}

/// Insert one library entry on an open connection or transaction.
pub(super) fn insert_library_equation(
    conn: &Connection,
    input: EquationSummaryInput,
) -> DbResult<EquationSummary> {
    let now = Utc::now();

    conn.execute(
        "INSERT INTO equation_library (project_template_id, name, description, category, mathml_content,
             variables, unit, created_at, usage_count)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0)",
        (
            input.project_template_id,
            &input.name,
            &input.description,
            &input.category,
            &input.mathml_content,
            to_json(&input.variables)?,
            &input.unit,
            now.to_rfc3339(),
        ),
    )?;

    Ok(EquationSummary {
        id: conn.last_insert_rowid(),
        project_template_id: input.project_template_id,
        name: input.name,
        description: input.description,
        category: input.category,
        mathml_content: input.mathml_content,
        variables: input.variables,
        unit: input.unit,
        created_at: now,
        last_used_at: None,
        usage_count: 0,
    })
}

impl Database {
    // ============================================================
    // Equation library operations
    // ============================================================

    pub fn get_library_equations(&self, category: Option<&str>) -> DbResult<Vec<EquationSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {LIBRARY_COLUMNS} FROM equation_library
             WHERE (?1 IS NULL OR category = ?1) ORDER BY name, id"
        ))?;

        let equations = stmt
            .query_map([category], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(equations)
    }

    pub fn get_library_equations_by_template(&self, template_id: i64) -> DbResult<Vec<EquationSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {LIBRARY_COLUMNS} FROM equation_library
             WHERE project_template_id = ? ORDER BY name, id"
        ))?;

        let equations = stmt
            .query_map([template_id], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(equations)
    }

    pub fn get_library_equation(&self, id: i64) -> DbResult<Option<EquationSummary>> {
        let conn = self.conn()?;
        let equation = conn
            .query_row(
                &format!("SELECT {LIBRARY_COLUMNS} FROM equation_library WHERE id = ?"),
                [id],
                summary_from_row,
            )
            .optional()?;
        Ok(equation)
    }

    pub fn count_library_equations(&self) -> DbResult<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM equation_library", [], |row| row.get(0))?)
    }

    pub fn create_library_equation(&self, input: EquationSummaryInput) -> DbResult<EquationSummary> {
        validate_summary(&input)?;
        if let Some(template_id) = input.project_template_id {
            self.get_project_template(template_id)?
                .ok_or_else(|| DbError::not_found("Project template", template_id))?;
        }

        let conn = self.conn()?;
        insert_library_equation(&conn, input)
    }

    /// Overwrite the descriptive fields of a library entry. Usage statistics are kept.
    pub fn replace_library_equation(
        &self,
        id: i64,
        input: EquationSummaryInput,
    ) -> DbResult<Option<EquationSummary>> {
        validate_summary(&input)?;
        let Some(existing) = self.get_library_equation(id)? else {
            return Ok(None);
        };
        if let Some(template_id) = input.project_template_id {
            self.get_project_template(template_id)?
                .ok_or_else(|| DbError::not_found("Project template", template_id))?;
        }

        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE equation_library SET project_template_id = ?, name = ?, description = ?, category = ?,
                 mathml_content = ?, variables = ?, unit = ?
             WHERE id = ?",
            (
                input.project_template_id,
                &input.name,
                &input.description,
                &input.category,
                &input.mathml_content,
                to_json(&input.variables)?,
                &input.unit,
                id,
            ),
        )?;
        if rows == 0 {
            return Ok(None);
        }

        Ok(Some(EquationSummary {
            id,
            project_template_id: input.project_template_id,
            name: input.name,
            description: input.description,
            category: input.category,
            mathml_content: input.mathml_content,
            variables: input.variables,
            unit: input.unit,
            created_at: existing.created_at,
            last_used_at: existing.last_used_at,
            usage_count: existing.usage_count,
        }))
    }

    /// Bump the usage counter and stamp `last_used_at`.
    pub fn record_library_usage(&self, id: i64) -> DbResult<Option<EquationSummary>> {
        let rows = {
            let conn = self.conn()?;
            conn.execute(
                "UPDATE equation_library SET usage_count = usage_count + 1, last_used_at = ? WHERE id = ?",
                (Utc::now().to_rfc3339(), id),
            )?
        };
        if rows == 0 {
            return Ok(None);
        }
        self.get_library_equation(id)
    }

    pub fn delete_library_equation(&self, id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM equation_library WHERE id = ?", [id])?;
        Ok(rows > 0)
    }
}
