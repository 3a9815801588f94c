use serde::{Deserialize, Serialize};
use std::fmt;

/// Which ledger a planning definition belongs to.
///
/// Serialized as `PF` (personal) and `PJ` (business); the long names are
/// accepted on input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanType {
    #[serde(rename = "PF", alias = "personal", alias = "Personal", alias = "pf")]
    Personal,
    #[serde(rename = "PJ", alias = "business", alias = "Business", alias = "pj")]
    Business,
}

impl PlanType {
    pub fn code(&self) -> &'static str {
        match self {
            PlanType::Personal => "PF",
            PlanType::Business => "PJ",
        }
    }

    /// Parse the wire code or the long name, case-insensitively.
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pf" | "personal" => Some(PlanType::Personal),
            "pj" | "business" => Some(PlanType::Business),
            _ => None,
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A recurring budget line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningDefinition {
    /// Format: "planning::<uuid>"
    pub id: String,
    pub plan_type: PlanType,
    pub category_name: String,
    /// Formula in the planning expression language, e.g. "(5000*28%)*27.5%"
    pub formula: Option<String>,
    /// Used only when `formula` is absent or blank
    pub base_value: f64,
    /// Last active month (YYYY-MM), inclusive
    pub end_month: Option<String>,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

/// A recorded value (and payment status) for one definition in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyOverride {
    /// Format: "override::<uuid>"
    pub id: String,
    pub planning_id: String,
    /// YYYY-MM
    pub month: String,
    pub value: f64,
    pub is_paid: bool,
    /// RFC 3339, present only while `is_paid` is true
    pub paid_date: Option<String>,
    pub version: u64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePlanningRequest {
    pub plan_type: PlanType,
    pub category_name: String,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub base_value: f64,
    #[serde(default)]
    pub end_month: Option<String>,
}

/// Full replacement of the editable fields of a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePlanningRequest {
    pub plan_type: PlanType,
    pub category_name: String,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub base_value: f64,
    #[serde(default)]
    pub end_month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningListResponse {
    pub definitions: Vec<PlanningDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningResponse {
    pub definition: PlanningDefinition,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletePlanningResponse {
    pub deleted_id: String,
    /// Number of monthly overrides removed along with the definition
    pub removed_overrides: u32,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMonthValueRequest {
    pub value: f64,
    #[serde(default)]
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPaidRequest {
    pub is_paid: bool,
    #[serde(default)]
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyOverrideResponse {
    pub monthly_override: MonthlyOverride,
}

/// Lifecycle of one (definition, month) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthItemState {
    /// No recorded value; the catalog default applies and is owed
    Defaulted,
    RecordedUnpaid,
    RecordedPaid,
}

/// A definition whose default could not be computed for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningWarning {
    pub planning_id: String,
    pub category_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthItem {
    pub planning_id: String,
    pub category_name: String,
    pub state: MonthItemState,
    pub override_id: Option<String>,
    pub override_version: Option<u64>,
    pub value: f64,
    pub pending_value: f64,
    pub paid_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotalsResponse {
    pub month: String,
    pub plan_type: PlanType,
    pub total: f64,
    pub pending_total: f64,
    pub paid_total: f64,
    pub warnings: Vec<PlanningWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthViewResponse {
    pub month: String,
    pub plan_type: PlanType,
    pub total: f64,
    pub pending_total: f64,
    pub paid_total: f64,
    pub items: Vec<MonthItem>,
    pub warnings: Vec<PlanningWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearOverviewResponse {
    pub year: i32,
    pub plan_type: PlanType,
    pub months: Vec<MonthlyTotalsResponse>,
    pub total: f64,
    pub pending_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateFormulaRequest {
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateFormulaResponse {
    pub formula: String,
    pub value: f64,
}

/// Body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable category, e.g. "formula_syntax", "not_found", "conflict"
    pub kind: String,
}
