//! Domain model for a recurring planning definition.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::PlanType;
use uuid::Uuid;

use super::month::MonthKey;

pub const MAX_CATEGORY_NAME_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningDefinition {
    pub id: String,
    pub plan_type: PlanType,
    pub category_name: String,
    pub formula: Option<String>,
    pub base_value: f64,
    pub end_month: Option<MonthKey>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlanningDefinition {
    pub fn generate_id() -> String {
        format!("planning::{}", Uuid::new_v4())
    }

    /// The formula, if it is present and not blank.
    pub fn effective_formula(&self) -> Option<&str> {
        self.formula
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    /// Inactive only for months strictly after `end_month`.
    pub fn is_active_in(&self, month: MonthKey) -> bool {
        match self.end_month {
            Some(end) => month <= end,
            None => true,
        }
    }
}
