//! Demonstration data inserted into an empty store.

use rusqlite::Connection;

use super::equations::insert_variable;
use super::library::insert_library_equation;
use super::templates::{insert_project_template, insert_task_template};
use super::{Database, DbResult};
use crate::models::*;

const MOMENT_CAPACITY_MATHML: &str = r#"<math xmlns="http://www.w3.org/1998/Math/MathML">
    <mrow>
        <msub><mi>M</mi><mi>n</mi></msub>
        <mo>=</mo>
        <msub><mi>f</mi><mi>y</mi></msub>
        <mo>×</mo>
        <msub><mi>S</mi><mi>x</mi></msub>
    </mrow>
</math>"#;

const SHEAR_CAPACITY_MATHML: &str = r#"<math xmlns="http://www.w3.org/1998/Math/MathML">
    <mrow>
        <msub><mi>V</mi><mi>n</mi></msub>
        <mo>=</mo>
        <mn>0.6</mn>
        <mo>×</mo>
        <msub><mi>f</mi><mi>y</mi></msub>
        <mo>×</mo>
        <msub><mi>A</mi><mi>w</mi></msub>
    </mrow>
</math>"#;

const DEFLECTION_MATHML: &str = r#"<math xmlns="http://www.w3.org/1998/Math/MathML">
    <mrow>
        <mi>δ</mi>
        <mo>=</mo>
        <mfrac>
            <mrow><mn>5</mn><mi>w</mi><msup><mi>L</mi><mn>4</mn></msup></mrow>
            <mrow><mn>384</mn><mi>E</mi><mi>I</mi></mrow>
        </mfrac>
    </mrow>
</math>"#;

/// What [`Database::seed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held projects or library equations; nothing was written.
    AlreadySeeded,
    Seeded {
        library_equations: usize,
        project_templates: usize,
        task_templates: usize,
        variables: usize,
    },
}

impl Database {
    /// Insert the demonstration library, templates and variables once.
    ///
    /// The store counts as seeded as soon as it holds any project or any
    /// library equation. All rows are written in a single transaction.
    pub fn seed(&self) -> DbResult<SeedOutcome> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        if has_data(&tx)? {
            tracing::debug!("Store already holds data, skipping seed");
            return Ok(SeedOutcome::AlreadySeeded);
        }

        let library_equations = library_seed()
            .into_iter()
            .map(|input| insert_library_equation(&tx, input))
            .collect::<DbResult<Vec<_>>>()?;
        let project_templates = vec![insert_project_template(&tx, project_template_seed())?];
        let task_templates = task_template_seed()
            .into_iter()
            .map(|input| insert_task_template(&tx, input))
            .collect::<DbResult<Vec<_>>>()?;
        let variables = variable_seed()
            .into_iter()
            .map(|input| insert_variable(&tx, None, input))
            .collect::<DbResult<Vec<_>>>()?;

        tx.commit()?;

        let outcome = SeedOutcome::Seeded {
            library_equations: library_equations.len(),
            project_templates: project_templates.len(),
            task_templates: task_templates.len(),
            variables: variables.len(),
        };
        tracing::info!(?outcome, "Seeded demonstration data");
        Ok(outcome)
    }
}

fn has_data(conn: &Connection) -> DbResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM projects) OR EXISTS (SELECT 1 FROM equation_library)",
        [],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn library_seed() -> Vec<EquationSummaryInput> {
    vec![
        EquationSummaryInput {
            name: "Moment Capacity".to_string(),
            description: Some("Steel beam moment capacity calculation".to_string()),
            category: "MomentCapacity".to_string(),
            mathml_content: MOMENT_CAPACITY_MATHML.to_string(),
            unit: Some("kNm".to_string()),
            ..Default::default()
        },
        EquationSummaryInput {
            name: "Shear Capacity".to_string(),
            description: Some("Steel beam shear capacity calculation".to_string()),
            category: "ShearCapacity".to_string(),
            mathml_content: SHEAR_CAPACITY_MATHML.to_string(),
            unit: Some("kN".to_string()),
            ..Default::default()
        },
        EquationSummaryInput {
            name: "Deflection".to_string(),
            description: Some("Simply supported beam deflection".to_string()),
            category: "Deflection".to_string(),
            mathml_content: DEFLECTION_MATHML.to_string(),
            unit: Some("mm".to_string()),
            ..Default::default()
        },
    ]
}

fn project_template_seed() -> ProjectTemplateInput {
    let default_settings = Settings::from([
        ("DefaultUnits".to_string(), SettingValue::from("SI")),
        ("SafetyFactor".to_string(), SettingValue::from(1.5)),
        ("DesignCode".to_string(), SettingValue::from("AISC")),
    ]);

    ProjectTemplateInput {
        name: "Steel Beam Analysis".to_string(),
        description: Some("Template for analyzing steel beam capacity and deflection".to_string()),
        category: Some("Structural".to_string()),
        created_by: Some("System".to_string()),
        is_public: true,
        usage_count: 0,
        default_settings: Some(default_settings),
    }
}

fn task_template_seed() -> Vec<TaskTemplateInput> {
    vec![
        TaskTemplateInput {
            name: "Moment Capacity Check".to_string(),
            description: Some("Check moment capacity of steel beam".to_string()),
            category: Some("Capacity".to_string()),
            default_priority: 2,
            estimated_duration_hours: 1,
            created_by: Some("System".to_string()),
            is_public: true,
            instructions: Some(
                "Calculate the nominal moment capacity using yield stress and section modulus"
                    .to_string(),
            ),
            ..Default::default()
        },
        TaskTemplateInput {
            name: "Deflection Check".to_string(),
            description: Some("Check deflection limits for serviceability".to_string()),
            category: Some("Serviceability".to_string()),
            default_priority: 1,
            estimated_duration_hours: 1,
            created_by: Some("System".to_string()),
            is_public: true,
            instructions: Some(
                "Calculate maximum deflection and compare to allowable limits".to_string(),
            ),
            ..Default::default()
        },
    ]
}

fn variable_seed() -> Vec<VariableInput> {
    let mut yield_strength = VariableInput::new("fy", VariableType::Input)
        .unit("MPa")
        .description("Yield strength of steel");
    yield_strength.display_name = "f_y".to_string();
    yield_strength.default_value = Some(250.0);

    let mut section_modulus = VariableInput::new("Sx", VariableType::Input)
        .unit("mm³")
        .description("Section modulus about x-axis");
    section_modulus.display_name = "S_x".to_string();

    let mut moment_capacity = VariableInput::new("Mn", VariableType::Output)
        .unit("kNm")
        .description("Nominal moment capacity");
    moment_capacity.display_name = "M_n".to_string();
    moment_capacity.is_required = false;

    vec![yield_strength, section_modulus, moment_capacity]
}
