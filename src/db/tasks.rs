use chrono::Utc;
use rusqlite::{OptionalExtension, Row};

use super::validate::{Validator, CARD_COLOR_MAX, DESCRIPTION_MAX, NAME_MAX, PERSON_MAX};
use super::{
    datetime_column, json_column, optional_datetime_column, to_json, to_sql_datetime, Database,
    DbError, DbResult,
};
use crate::models::*;

const TASK_COLUMNS: &str = "id, project_id, name, description, status, priority, created_at, due_date, completed_at, assigned_to, notes";

const TASK_CARD_COLUMNS: &str = "id, task_id, title, description, status, priority, created_at, due_date, assigned_to, card_color, tags, progress_percentage, notes";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        status: row.get(4)?,
        priority: row.get(5)?,
        created_at: datetime_column(row, 6)?,
        due_date: optional_datetime_column(row, 7)?,
        completed_at: optional_datetime_column(row, 8)?,
        assigned_to: row.get(9)?,
        notes: row.get(10)?,
    })
}

fn task_card_from_row(row: &Row<'_>) -> rusqlite::Result<TaskCard> {
    Ok(TaskCard {
        id: row.get(0)?,
        task_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: row.get(4)?,
        priority: row.get(5)?,
        created_at: datetime_column(row, 6)?,
        due_date: optional_datetime_column(row, 7)?,
        assigned_to: row.get(8)?,
        card_color: row.get(9)?,
        tags: json_column(row, 10)?,
        progress_percentage: row.get(11)?,
        notes: row.get(12)?,
    })
}

fn validate_task(input: &TaskInput) -> DbResult<()> {
    Validator::new("task")
        .required("name", &input.name, NAME_MAX)
        .max_len("description", input.description.as_deref(), DESCRIPTION_MAX)
        .max_len("assigned_to", input.assigned_to.as_deref(), PERSON_MAX)
        .finish()
}

fn validate_task_card(input: &TaskCardInput) -> DbResult<()> {
    Validator::new("task card")
        .required("title", &input.title, NAME_MAX)
        .max_len("description", input.description.as_deref(), DESCRIPTION_MAX)
        .max_len("assigned_to", input.assigned_to.as_deref(), PERSON_MAX)
        .max_len("card_color", input.card_color.as_deref(), CARD_COLOR_MAX)
        .range("progress_percentage", input.progress_percentage, 0, 100)
        .finish()
}

impl Database {
    // ============================================================
    // Task operations
    // ============================================================

    pub fn get_task(&self, id: i64) -> DbResult<Option<Task>> {
        let conn = self.conn()?;
        let task = conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"),
                [id],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    pub fn get_tasks_by_project(&self, project_id: i64) -> DbResult<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ? ORDER BY created_at, id"
        ))?;

        let tasks = stmt
            .query_map([project_id], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    pub fn create_task(&self, project_id: i64, input: TaskInput) -> DbResult<Task> {
        validate_task(&input)?;
        // Verify project exists
        self.get_project(project_id)?
            .ok_or_else(|| DbError::not_found("Project", project_id))?;

        let conn = self.conn()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO tasks (project_id, name, description, status, priority, created_at, due_date, completed_at, assigned_to, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                project_id,
                &input.name,
                &input.description,
                &input.status,
                &input.priority,
                now.to_rfc3339(),
                to_sql_datetime(input.due_date),
                to_sql_datetime(input.completed_at),
                &input.assigned_to,
                &input.notes,
            ),
        )?;

        Ok(Task {
            id: conn.last_insert_rowid(),
            project_id,
            name: input.name,
            description: input.description,
            status: input.status,
            priority: input.priority,
            created_at: now,
            due_date: input.due_date,
            completed_at: input.completed_at,
            assigned_to: input.assigned_to,
            notes: input.notes,
        })
    }

    /// Overwrite every mutable field of a task. The owning project is kept.
    pub fn replace_task(&self, id: i64, input: TaskInput) -> DbResult<Option<Task>> {
        validate_task(&input)?;
        let Some(existing) = self.get_task(id)? else {
            return Ok(None);
        };

        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE tasks SET name = ?, description = ?, status = ?, priority = ?, due_date = ?,
                 completed_at = ?, assigned_to = ?, notes = ?
             WHERE id = ?",
            (
                &input.name,
                &input.description,
                &input.status,
                &input.priority,
                to_sql_datetime(input.due_date),
                to_sql_datetime(input.completed_at),
                &input.assigned_to,
                &input.notes,
                id,
            ),
        )?;
        if rows == 0 {
            return Ok(None);
        }

        Ok(Some(Task {
            id,
            project_id: existing.project_id,
            name: input.name,
            description: input.description,
            status: input.status,
            priority: input.priority,
            created_at: existing.created_at,
            due_date: input.due_date,
            completed_at: input.completed_at,
            assigned_to: input.assigned_to,
            notes: input.notes,
        }))
    }

    /// Delete a task together with its cards.
    pub fn delete_task(&self, id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM tasks WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    pub fn get_task_with_cards(&self, id: i64) -> DbResult<Option<TaskWithCards>> {
        let Some(task) = self.get_task(id)? else {
            return Ok(None);
        };
        let task_cards = self.get_task_cards_by_task(id)?;
        Ok(Some(TaskWithCards { task, task_cards }))
    }

    // ============================================================
    // Task card operations
    // ============================================================

    pub fn get_task_card(&self, id: i64) -> DbResult<Option<TaskCard>> {
        let conn = self.conn()?;
        let card = conn
            .query_row(
                &format!("SELECT {TASK_CARD_COLUMNS} FROM task_cards WHERE id = ?"),
                [id],
                task_card_from_row,
            )
            .optional()?;
        Ok(card)
    }

    pub fn get_task_cards_by_task(&self, task_id: i64) -> DbResult<Vec<TaskCard>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TASK_CARD_COLUMNS} FROM task_cards WHERE task_id = ? ORDER BY created_at, id"
        ))?;

        let cards = stmt
            .query_map([task_id], task_card_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cards)
    }

    pub fn create_task_card(&self, task_id: i64, input: TaskCardInput) -> DbResult<TaskCard> {
        validate_task_card(&input)?;
        self.get_task(task_id)?
            .ok_or_else(|| DbError::not_found("Task", task_id))?;

        let conn = self.conn()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO task_cards (task_id, title, description, status, priority, created_at, due_date,
                 assigned_to, card_color, tags, progress_percentage, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                task_id,
                &input.title,
                &input.description,
                &input.status,
                &input.priority,
                now.to_rfc3339(),
                to_sql_datetime(input.due_date),
                &input.assigned_to,
                &input.card_color,
                to_json(&input.tags)?,
                input.progress_percentage,
                &input.notes,
            ),
        )?;

        Ok(TaskCard {
            id: conn.last_insert_rowid(),
            task_id,
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            created_at: now,
            due_date: input.due_date,
            assigned_to: input.assigned_to,
            card_color: input.card_color,
            tags: input.tags,
            progress_percentage: input.progress_percentage,
            notes: input.notes,
        })
    }

    /// Overwrite every mutable field of a card. The owning task is kept.
    pub fn replace_task_card(&self, id: i64, input: TaskCardInput) -> DbResult<Option<TaskCard>> {
        validate_task_card(&input)?;
        let Some(existing) = self.get_task_card(id)? else {
            return Ok(None);
        };

        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE task_cards SET title = ?, description = ?, status = ?, priority = ?, due_date = ?,
                 assigned_to = ?, card_color = ?, tags = ?, progress_percentage = ?, notes = ?
             WHERE id = ?",
            (
                &input.title,
                &input.description,
                &input.status,
                &input.priority,
                to_sql_datetime(input.due_date),
                &input.assigned_to,
                &input.card_color,
                to_json(&input.tags)?,
                input.progress_percentage,
                &input.notes,
                id,
            ),
        )?;
        if rows == 0 {
            return Ok(None);
        }

        Ok(Some(TaskCard {
            id,
            task_id: existing.task_id,
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            created_at: existing.created_at,
            due_date: input.due_date,
            assigned_to: input.assigned_to,
            card_color: input.card_color,
            tags: input.tags,
            progress_percentage: input.progress_percentage,
            notes: input.notes,
        }))
    }

    pub fn delete_task_card(&self, id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM task_cards WHERE id = ?", [id])?;
        Ok(rows > 0)
    }
}
