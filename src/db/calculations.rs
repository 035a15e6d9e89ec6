use chrono::Utc;
use rusqlite::{OptionalExtension, Row};

use super::validate::{Validator, MESSAGE_MAX, UNIT_MAX};
use super::{datetime_column, json_column, to_json, Database, DbError, DbResult};
use crate::models::*;

const RESULT_COLUMNS: &str =
    "id, equation_id, value, unit, is_valid, error_message, calculated_at, variables";

fn result_from_row(row: &Row<'_>) -> rusqlite::Result<CalculationResult> {
    Ok(CalculationResult {
        id: row.get(0)?,
        equation_id: row.get(1)?,
        value: row.get(2)?,
        unit: row.get(3)?,
        is_valid: row.get::<_, i32>(4)? != 0,
        error_message: row.get(5)?,
        calculated_at: datetime_column(row, 6)?,
        variables: json_column(row, 7)?,
    })
}

impl Database {
    // ============================================================
    // Calculation result operations
    // ============================================================

    /// All results, newest first.
    pub fn get_all_calculation_results(&self) -> DbResult<Vec<CalculationResult>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RESULT_COLUMNS} FROM calculation_results ORDER BY calculated_at DESC, id DESC"
        ))?;

        let results = stmt
            .query_map([], result_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(results)
    }

    pub fn get_results_by_equation(&self, equation_id: i64) -> DbResult<Vec<CalculationResult>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RESULT_COLUMNS} FROM calculation_results WHERE equation_id = ?
             ORDER BY calculated_at DESC, id DESC"
        ))?;

        let results = stmt
            .query_map([equation_id], result_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(results)
    }

    pub fn get_calculation_result(&self, id: i64) -> DbResult<Option<CalculationResult>> {
        let conn = self.conn()?;
        let result = conn
            .query_row(
                &format!("SELECT {RESULT_COLUMNS} FROM calculation_results WHERE id = ?"),
                [id],
                result_from_row,
            )
            .optional()?;
        Ok(result)
    }

    /// Load a result with the equation it was computed from.
    pub fn get_calculation_result_with_equation(
        &self,
        id: i64,
    ) -> DbResult<Option<CalculationResultWithEquation>> {
        let Some(result) = self.get_calculation_result(id)? else {
            return Ok(None);
        };
        let parsed_equation = match result.equation_id {
            Some(equation_id) => self.get_equation(equation_id)?,
            None => None,
        };
        Ok(Some(CalculationResultWithEquation {
            result,
            parsed_equation,
        }))
    }

    pub fn create_calculation_result(
        &self,
        input: CalculationResultInput,
    ) -> DbResult<CalculationResult> {
        Validator::new("calculation result")
            .max_len("unit", input.unit.as_deref(), UNIT_MAX)
            .max_len("error_message", input.error_message.as_deref(), MESSAGE_MAX)
            .finish()?;
        if let Some(equation_id) = input.equation_id {
            self.get_equation(equation_id)?
                .ok_or_else(|| DbError::not_found("Equation", equation_id))?;
        }

        let conn = self.conn()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO calculation_results (equation_id, value, unit, is_valid, error_message, calculated_at, variables)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                input.equation_id,
                input.value,
                &input.unit,
                input.is_valid,
                &input.error_message,
                now.to_rfc3339(),
                to_json(&input.variables)?,
            ),
        )?;

        Ok(CalculationResult {
            id: conn.last_insert_rowid(),
            equation_id: input.equation_id,
            value: input.value,
            unit: input.unit,
            is_valid: input.is_valid,
            error_message: input.error_message,
            calculated_at: now,
            variables: input.variables,
        })
    }

    pub fn delete_calculation_result(&self, id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM calculation_results WHERE id = ?", [id])?;
        Ok(rows > 0)
    }
}
