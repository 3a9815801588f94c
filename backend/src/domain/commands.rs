//! Command and result types accepted and returned by the planning service.
use shared::PlanType;

use crate::domain::models::{MonthKey, MonthlyOverride, PlanningDefinition};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateDefinitionCommand {
    pub plan_type: PlanType,
    pub category_name: String,
    pub formula: Option<String>,
    pub base_value: f64,
    pub end_month: Option<MonthKey>,
}

/// Full replacement of the editable fields of a definition
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDefinitionCommand {
    pub planning_id: String,
    pub plan_type: PlanType,
    pub category_name: String,
    pub formula: Option<String>,
    pub base_value: f64,
    pub end_month: Option<MonthKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordMonthValueCommand {
    pub planning_id: String,
    pub month: MonthKey,
    pub value: f64,
    /// Only checked when an override already exists for the month
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetPaidCommand {
    pub override_id: String,
    pub is_paid: bool,
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetMonthPaidCommand {
    pub planning_id: String,
    pub month: MonthKey,
    pub is_paid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionResult {
    pub definition: PlanningDefinition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteDefinitionResult {
    pub deleted: PlanningDefinition,
    pub removed_overrides: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverrideResult {
    pub monthly_override: MonthlyOverride,
}
