//! Field checks applied before rows are written.
//!
//! SQLite does not enforce declared text lengths, so required fields and
//! length limits are checked here and reported together.

use super::error::{DbError, DbResult};

pub(crate) const NAME_MAX: usize = 200;
pub(crate) const DESCRIPTION_MAX: usize = 1000;
pub(crate) const PERSON_MAX: usize = 100;
pub(crate) const CATEGORY_MAX: usize = 100;
pub(crate) const UNIT_MAX: usize = 50;
pub(crate) const LATEX_MAX: usize = 2000;
pub(crate) const INSTRUCTIONS_MAX: usize = 2000;
pub(crate) const MESSAGE_MAX: usize = 1000;
pub(crate) const VARIABLE_NAME_MAX: usize = 100;
pub(crate) const VARIABLE_DESCRIPTION_MAX: usize = 500;
pub(crate) const CARD_COLOR_MAX: usize = 20;

pub(crate) struct Validator {
    entity: &'static str,
    problems: Vec<String>,
}

impl Validator {
    pub(crate) fn new(entity: &'static str) -> Self {
        Self {
            entity,
            problems: Vec::new(),
        }
    }

    /// Field must be non-blank and at most `max` characters.
    pub(crate) fn required(mut self, field: &str, value: &str, max: usize) -> Self {
        if value.trim().is_empty() {
            self.problems.push(format!("{field} is required"));
        } else {
            self = self.check_len(field, value, max);
        }
        self
    }

    pub(crate) fn max_len(self, field: &str, value: Option<&str>, max: usize) -> Self {
        match value {
            Some(value) => self.check_len(field, value, max),
            None => self,
        }
    }

    pub(crate) fn range(mut self, field: &str, value: Option<i32>, min: i32, max: i32) -> Self {
        if let Some(value) = value {
            if !(min..=max).contains(&value) {
                self.problems
                    .push(format!("{field} must be between {min} and {max} (got {value})"));
            }
        }
        self
    }

    pub(crate) fn finish(self) -> DbResult<()> {
        if self.problems.is_empty() {
            return Ok(());
        }
        tracing::debug!(entity = self.entity, problems = ?self.problems, "Rejected input");
        Err(DbError::InvalidInput(format!(
            "{}: {}",
            self.entity,
            self.problems.join("; ")
        )))
    }

    fn check_len(mut self, field: &str, value: &str, max: usize) -> Self {
        let len = value.chars().count();
        if len > max {
            self.problems
                .push(format!("{field} exceeds {max} characters (got {len})"));
        }
        self
    }
}
