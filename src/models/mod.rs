//! Domain models for the MathML parser store.
//!
//! # Core Concepts
//!
//! ## Project tracking
//!
//! - [`Project`]: Top-level container for engineering work. Owns its tasks.
//! - [`Task`]: A unit of work inside a project. Owns its task cards.
//! - [`TaskCard`]: A board card tracking progress on part of a task.
//!
//! ## Equations
//!
//! - [`ParsedEquation`]: An equation stored as MathML, with optional LaTeX and
//!   the validation flags reported by the (external) parser.
//! - [`Variable`]: A symbol used by an equation. Seeded variables may stand alone.
//! - [`CalculationResult`]: A value computed for an equation, with the inputs used.
//! - [`ValidationResult`]: Read-only view of an equation's validation state.
//!
//! ## Templates and library
//!
//! - [`ProjectTemplate`]: Reusable starting point for new projects.
//! - [`TaskTemplate`]: Reusable task description, optionally part of a project template.
//! - [`EquationSummary`]: Entry of the shared equation library.
//!
//! Map-valued fields use [`Settings`], a map of [`SettingValue`]s, and are
//! persisted as JSON text.

mod calculation;
mod equation;
mod library;
mod project;
mod task;
mod task_card;
mod template;
mod validation;
mod value;

pub use calculation::*;
pub use equation::*;
pub use library::*;
pub use project::*;
pub use task::*;
pub use task_card::*;
pub use template::*;
pub use validation::*;
pub use value::*;

pub(crate) fn default_true() -> bool {
    true
}
