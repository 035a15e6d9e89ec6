use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};

use super::validate::{
    Validator, CATEGORY_MAX, DESCRIPTION_MAX, INSTRUCTIONS_MAX, NAME_MAX, PERSON_MAX,
};
use super::{datetime_column, json_column, optional_datetime_column, to_json, Database, DbError, DbResult};
use crate::models::*;

const PROJECT_TEMPLATE_COLUMNS: &str = "id, name, description, category, created_at, modified_at, created_by, is_public, usage_count, default_settings";

const TASK_TEMPLATE_COLUMNS: &str = "id, project_template_id, name, description, category, default_priority, estimated_duration_hours, required_equations, default_tags, created_at, modified_at, created_by, is_public, instructions";

fn project_template_from_row(row: &Row<'_>) -> rusqlite::Result<ProjectTemplate> {
    Ok(ProjectTemplate {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        created_at: datetime_column(row, 4)?,
        modified_at: optional_datetime_column(row, 5)?,
        created_by: row.get(6)?,
        is_public: row.get::<_, i32>(7)? != 0,
        usage_count: row.get(8)?,
        default_settings: json_column(row, 9)?,
    })
}

fn task_template_from_row(row: &Row<'_>) -> rusqlite::Result<TaskTemplate> {
    Ok(TaskTemplate {
        id: row.get(0)?,
        project_template_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        default_priority: row.get(5)?,
        estimated_duration_hours: row.get(6)?,
        required_equations: json_column(row, 7)?,
        default_tags: json_column(row, 8)?,
        created_at: datetime_column(row, 9)?,
        modified_at: optional_datetime_column(row, 10)?,
        created_by: row.get(11)?,
        is_public: row.get::<_, i32>(12)? != 0,
        instructions: row.get(13)?,
    })
}

fn validate_project_template(input: &ProjectTemplateInput) -> DbResult<()> {
    Validator::new("project template")
        .required("name", &input.name, NAME_MAX)
        .max_len("description", input.description.as_deref(), DESCRIPTION_MAX)
        .max_len("category", input.category.as_deref(), CATEGORY_MAX)
        .max_len("created_by", input.created_by.as_deref(), PERSON_MAX)
        .finish()
}

fn validate_task_template(input: &TaskTemplateInput) -> DbResult<()> {
    Validator::new("task template")
        .required("name", &input.name, NAME_MAX)
        .max_len("description", input.description.as_deref(), DESCRIPTION_MAX)
        .max_len("category", input.category.as_deref(), CATEGORY_MAX)
        .max_len("created_by", input.created_by.as_deref(), PERSON_MAX)
        .max_len("instructions", input.instructions.as_deref(), INSTRUCTIONS_MAX)
        .finish()
}

/// Insert one project template on an open connection or transaction.
pub(super) fn insert_project_template(
    conn: &Connection,
    input: ProjectTemplateInput,
) -> DbResult<ProjectTemplate> {
    let now = Utc::now();

    conn.execute(
        "INSERT INTO project_templates (name, description, category, created_at, created_by, is_public, usage_count, default_settings)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        (
            &input.name,
            &input.description,
            &input.category,
            now.to_rfc3339(),
            &input.created_by,
            input.is_public,
            input.usage_count,
            to_json(&input.default_settings)?,
        ),
    )?;

    Ok(ProjectTemplate {
        id: conn.last_insert_rowid(),
        name: input.name,
        description: input.description,
        category: input.category,
        created_at: now,
        modified_at: None,
        created_by: input.created_by,
        is_public: input.is_public,
        usage_count: input.usage_count,
        default_settings: input.default_settings,
    })
}

/// Insert one task template on an open connection or transaction.
pub(super) fn insert_task_template(
    conn: &Connection,
    input: TaskTemplateInput,
) -> DbResult<TaskTemplate> {
    let now = Utc::now();

    conn.execute(
        "INSERT INTO task_templates (project_template_id, name, description, category, default_priority,
             estimated_duration_hours, required_equations, default_tags, created_at, created_by, is_public, instructions)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        (
            input.project_template_id,
            &input.name,
            &input.description,
            &input.category,
            input.default_priority,
            input.estimated_duration_hours,
            to_json(&input.required_equations)?,
            to_json(&input.default_tags)?,
            now.to_rfc3339(),
            &input.created_by,
            input.is_public,
            &input.instructions,
        ),
    )?;

    Ok(TaskTemplate {
        id: conn.last_insert_rowid(),
        project_template_id: input.project_template_id,
        name: input.name,
        description: input.description,
        category: input.category,
        default_priority: input.default_priority,
        estimated_duration_hours: input.estimated_duration_hours,
        required_equations: input.required_equations,
        default_tags: input.default_tags,
        created_at: now,
        modified_at: None,
        created_by: input.created_by,
        is_public: input.is_public,
        instructions: input.instructions,
    })
}

impl Database {
    // ============================================================
    // Project template operations
    // ============================================================

    pub fn get_all_project_templates(&self, category: Option<&str>) -> DbResult<Vec<ProjectTemplate>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_TEMPLATE_COLUMNS} FROM project_templates
             WHERE (?1 IS NULL OR category = ?1) ORDER BY name, id"
        ))?;

        let templates = stmt
            .query_map([category], project_template_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(templates)
    }

    pub fn get_project_template(&self, id: i64) -> DbResult<Option<ProjectTemplate>> {
        let conn = self.conn()?;
        let template = conn
            .query_row(
                &format!("SELECT {PROJECT_TEMPLATE_COLUMNS} FROM project_templates WHERE id = ?"),
                [id],
                project_template_from_row,
            )
            .optional()?;
        Ok(template)
    }

    /// Load a template with the task templates and library equations pointing at it.
    pub fn get_project_template_with_children(
        &self,
        id: i64,
    ) -> DbResult<Option<ProjectTemplateWithChildren>> {
        let Some(template) = self.get_project_template(id)? else {
            return Ok(None);
        };

        let task_templates = {
            let conn = self.conn()?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_TEMPLATE_COLUMNS} FROM task_templates
                 WHERE project_template_id = ? ORDER BY name, id"
            ))?;
            let rows = stmt
                .query_map([id], task_template_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        let default_equations = self.get_library_equations_by_template(id)?;

        Ok(Some(ProjectTemplateWithChildren {
            template,
            task_templates,
            default_equations,
        }))
    }

    pub fn create_project_template(&self, input: ProjectTemplateInput) -> DbResult<ProjectTemplate> {
        validate_project_template(&input)?;

        let conn = self.conn()?;
        insert_project_template(&conn, input)
    }

    pub fn replace_project_template(
        &self,
        id: i64,
        input: ProjectTemplateInput,
    ) -> DbResult<Option<ProjectTemplate>> {
        validate_project_template(&input)?;
        let Some(existing) = self.get_project_template(id)? else {
            return Ok(None);
        };

        let conn = self.conn()?;
        let now = Utc::now();

        let rows = conn.execute(
            "UPDATE project_templates SET name = ?, description = ?, category = ?, modified_at = ?,
                 created_by = ?, is_public = ?, usage_count = ?, default_settings = ?
             WHERE id = ?",
            (
                &input.name,
                &input.description,
                &input.category,
                now.to_rfc3339(),
                &input.created_by,
                input.is_public,
                input.usage_count,
                to_json(&input.default_settings)?,
                id,
            ),
        )?;
        if rows == 0 {
            return Ok(None);
        }

        Ok(Some(ProjectTemplate {
            id,
            name: input.name,
            description: input.description,
            category: input.category,
            created_at: existing.created_at,
            modified_at: Some(now),
            created_by: input.created_by,
            is_public: input.is_public,
            usage_count: input.usage_count,
            default_settings: input.default_settings,
        }))
    }

    /// Delete a template. Projects, task templates and library equations that
    /// referenced it are kept with the reference cleared.
    pub fn delete_project_template(&self, id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM project_templates WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Task template operations
    // ============================================================

    pub fn get_all_task_templates(&self, category: Option<&str>) -> DbResult<Vec<TaskTemplate>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_TEMPLATE_COLUMNS} FROM task_templates
             WHERE (?1 IS NULL OR category = ?1) ORDER BY name, id"
        ))?;

        let templates = stmt
            .query_map([category], task_template_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(templates)
    }

    pub fn get_task_template(&self, id: i64) -> DbResult<Option<TaskTemplate>> {
        let conn = self.conn()?;
        let template = conn
            .query_row(
                &format!("SELECT {TASK_TEMPLATE_COLUMNS} FROM task_templates WHERE id = ?"),
                [id],
                task_template_from_row,
            )
            .optional()?;
        Ok(template)
    }

    pub fn create_task_template(&self, input: TaskTemplateInput) -> DbResult<TaskTemplate> {
        validate_task_template(&input)?;
        if let Some(template_id) = input.project_template_id {
            self.get_project_template(template_id)?
                .ok_or_else(|| DbError::not_found("Project template", template_id))?;
        }

        let conn = self.conn()?;
        insert_task_template(&conn, input)
    }

    pub fn replace_task_template(
        &self,
        id: i64,
        input: TaskTemplateInput,
    ) -> DbResult<Option<TaskTemplate>> {
        validate_task_template(&input)?;
        let Some(existing) = self.get_task_template(id)? else {
            return Ok(None);
        };
        if let Some(template_id) = input.project_template_id {
            self.get_project_template(template_id)?
                .ok_or_else(|| DbError::not_found("Project template", template_id))?;
        }

        let conn = self.conn()?;
        let now = Utc::now();

        let rows = conn.execute(
            "UPDATE task_templates SET project_template_id = ?, name = ?, description = ?, category = ?,
                 default_priority = ?, estimated_duration_hours = ?, required_equations = ?, default_tags = ?,
                 modified_at = ?, created_by = ?, is_public = ?, instructions = ?
             WHERE id = ?",
            (
                input.project_template_id,
                &input.name,
                &input.description,
                &input.category,
                input.default_priority,
                input.estimated_duration_hours,
                to_json(&input.required_equations)?,
                to_json(&input.default_tags)?,
                now.to_rfc3339(),
                &input.created_by,
                input.is_public,
                &input.instructions,
                id,
            ),
        )?;
        if rows == 0 {
            return Ok(None);
        }

        Ok(Some(TaskTemplate {
            id,
            project_template_id: input.project_template_id,
            name: input.name,
            description: input.description,
            category: input.category,
            default_priority: input.default_priority,
            estimated_duration_hours: input.estimated_duration_hours,
            required_equations: input.required_equations,
            default_tags: input.default_tags,
            created_at: existing.created_at,
            modified_at: Some(now),
            created_by: input.created_by,
            is_public: input.is_public,
            instructions: input.instructions,
        }))
    }

    pub fn delete_task_template(&self, id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM task_templates WHERE id = ?", [id])?;
        Ok(rows > 0)
    }
}
