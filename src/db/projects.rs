use chrono::Utc;
use rusqlite::{OptionalExtension, Row};

use super::validate::{Validator, DESCRIPTION_MAX, NAME_MAX, PERSON_MAX};
use super::{
    datetime_column, json_column, optional_datetime_column, to_json, to_sql_datetime, Database,
    DbError, DbResult,
};
use crate::models::*;

const PROJECT_COLUMNS: &str = "id, name, description, created_at, modified_at, created_by, status, due_date, project_template_id, settings";

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: datetime_column(row, 3)?,
        modified_at: optional_datetime_column(row, 4)?,
        created_by: row.get(5)?,
        status: row.get(6)?,
        due_date: optional_datetime_column(row, 7)?,
        project_template_id: row.get(8)?,
        settings: json_column(row, 9)?,
    })
}

fn validate_project(input: &ProjectInput) -> DbResult<()> {
    Validator::new("project")
        .required("name", &input.name, NAME_MAX)
        .max_len("description", input.description.as_deref(), DESCRIPTION_MAX)
        .max_len("created_by", input.created_by.as_deref(), PERSON_MAX)
        .finish()
}

impl Database {
    // ============================================================
    // Project operations
    // ============================================================

    pub fn get_all_projects(&self) -> DbResult<Vec<Project>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY name"
        ))?;

        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    pub fn get_project(&self, id: i64) -> DbResult<Option<Project>> {
        let conn = self.conn()?;
        let project = conn
            .query_row(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"),
                [id],
                project_from_row,
            )
            .optional()?;
        Ok(project)
    }

    pub fn count_projects(&self) -> DbResult<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?)
    }

    pub fn create_project(&self, input: ProjectInput) -> DbResult<Project> {
        validate_project(&input)?;
        if let Some(template_id) = input.project_template_id {
            self.get_project_template(template_id)?
                .ok_or_else(|| DbError::not_found("Project template", template_id))?;
        }

        let conn = self.conn()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO projects (name, description, created_at, created_by, status, due_date, project_template_id, settings)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            (
                &input.name,
                &input.description,
                now.to_rfc3339(),
                &input.created_by,
                &input.status,
                to_sql_datetime(input.due_date),
                input.project_template_id,
                to_json(&input.settings)?,
            ),
        )?;

        Ok(Project {
            id: conn.last_insert_rowid(),
            name: input.name,
            description: input.description,
            created_at: now,
            modified_at: None,
            created_by: input.created_by,
            status: input.status,
            due_date: input.due_date,
            project_template_id: input.project_template_id,
            settings: input.settings,
        })
    }

    /// Overwrite every mutable field of a project.
    pub fn replace_project(&self, id: i64, input: ProjectInput) -> DbResult<Option<Project>> {
        validate_project(&input)?;
        let Some(existing) = self.get_project(id)? else {
            return Ok(None);
        };
        if let Some(template_id) = input.project_template_id {
            self.get_project_template(template_id)?
                .ok_or_else(|| DbError::not_found("Project template", template_id))?;
        }

        let conn = self.conn()?;
        let now = Utc::now();

        let rows = conn.execute(
            "UPDATE projects SET name = ?, description = ?, modified_at = ?, created_by = ?, status = ?,
                 due_date = ?, project_template_id = ?, settings = ?
             WHERE id = ?",
            (
                &input.name,
                &input.description,
                now.to_rfc3339(),
                &input.created_by,
                &input.status,
                to_sql_datetime(input.due_date),
                input.project_template_id,
                to_json(&input.settings)?,
                id,
            ),
        )?;
        if rows == 0 {
            return Ok(None);
        }

        Ok(Some(Project {
            id,
            name: input.name,
            description: input.description,
            created_at: existing.created_at,
            modified_at: Some(now),
            created_by: input.created_by,
            status: input.status,
            due_date: input.due_date,
            project_template_id: input.project_template_id,
            settings: input.settings,
        }))
    }

    /// Delete a project together with its tasks and their cards.
    pub fn delete_project(&self, id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM projects WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    /// Load a project with its tasks and each task's cards.
    pub fn get_project_with_tasks(&self, id: i64) -> DbResult<Option<ProjectWithTasks>> {
        let Some(project) = self.get_project(id)? else {
            return Ok(None);
        };

        let tasks = self
            .get_tasks_by_project(id)?
            .into_iter()
            .map(|task| {
                let task_cards = self.get_task_cards_by_task(task.id)?;
                Ok(TaskWithCards { task, task_cards })
            })
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Some(ProjectWithTasks { project, tasks }))
    }
}
