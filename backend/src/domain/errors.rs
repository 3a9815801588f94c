use crate::domain::formula::FormulaError;
use crate::domain::override_store::OverrideNotFound;

/// Failures surfaced by the planning service
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    #[error("{0}")]
    Validation(String),
    #[error("Planning definition not found: {0}")]
    DefinitionNotFound(String),
    #[error("Monthly override not found: {0}")]
    OverrideNotFound(String),
    #[error("Monthly override {id} changed concurrently: expected version {expected}, found {actual}")]
    OverrideConflict { id: String, expected: u64, actual: u64 },
    #[error("Invalid formula: {0}")]
    Formula(#[from] FormulaError),
    #[error("Storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl PlanningError {
    /// Stable machine-readable name, used in REST error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            PlanningError::Validation(_) => "validation",
            PlanningError::DefinitionNotFound(_) => "definition_not_found",
            PlanningError::OverrideNotFound(_) => "override_not_found",
            PlanningError::OverrideConflict { .. } => "override_conflict",
            PlanningError::Formula(e) => match e.kind() {
                crate::domain::formula::FormulaErrorKind::Syntax => "formula_syntax",
                crate::domain::formula::FormulaErrorKind::Result => "formula_result",
            },
            PlanningError::Storage(_) => "storage",
        }
    }
}

impl From<OverrideNotFound> for PlanningError {
    fn from(e: OverrideNotFound) -> Self {
        PlanningError::OverrideNotFound(e.0)
    }
}

pub type PlanningResult<T> = Result<T, PlanningError>;
