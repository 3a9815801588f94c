//! The set of planning definitions known at aggregation time.
use shared::PlanType;

use crate::domain::formula::{FormulaError, FormulaEvaluator};
use crate::domain::models::{MonthKey, PlanningDefinition};

/// In-memory snapshot of planning definitions, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct PlanningCatalog {
    definitions: Vec<PlanningDefinition>,
    evaluator: FormulaEvaluator,
}

impl PlanningCatalog {
    pub fn new(definitions: Vec<PlanningDefinition>) -> Self {
        Self {
            definitions,
            evaluator: FormulaEvaluator::new(),
        }
    }

    pub fn is_active_in_month(&self, definition: &PlanningDefinition, month: MonthKey) -> bool {
        definition.is_active_in(month)
    }

    /// The formula result when a formula is set, otherwise the base value.
    pub fn default_value_for(&self, definition: &PlanningDefinition) -> Result<f64, FormulaError> {
        match definition.effective_formula() {
            Some(formula) => self.evaluator.evaluate(formula),
            None => Ok(definition.base_value),
        }
    }

    pub fn by_type(&self, plan_type: PlanType) -> Vec<&PlanningDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.plan_type == plan_type)
            .collect()
    }

    pub fn active_in_month(&self, plan_type: PlanType, month: MonthKey) -> Vec<&PlanningDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.plan_type == plan_type && self.is_active_in_month(d, month))
            .collect()
    }
}
