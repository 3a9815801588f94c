//! Monthly aggregation over planning definitions and their overrides.
//!
//! For a given month and plan type, every active definition resolves to
//! either its catalog default or the override recorded for that month:
//!
//! | state            | displayed value | counted as pending |
//! |------------------|-----------------|--------------------|
//! | Defaulted        | catalog default | yes                |
//! | Recorded-Unpaid  | override value  | yes                |
//! | Recorded-Paid    | override value  | no                 |
//!
//! A definition whose default formula cannot be evaluated contributes zero
//! and is reported as a [`PlanningWarning`]; it never fails the aggregate.

use chrono::{DateTime, Utc};
use log::warn;
use shared::{MonthItemState, PlanType, PlanningWarning};

use crate::domain::formula::FormulaError;
use crate::domain::models::{MonthKey, MonthKeyError, PlanningDefinition};
use crate::domain::override_store::MonthlyOverrideStore;
use crate::domain::planning_catalog::PlanningCatalog;

/// Where the value of one (definition, month) pair comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Default(f64),
    Overridden {
        override_id: String,
        value: f64,
        is_paid: bool,
    },
}

impl Resolution {
    pub fn value(&self) -> f64 {
        match self {
            Resolution::Default(value) => *value,
            Resolution::Overridden { value, .. } => *value,
        }
    }

    /// The part of the value still owed.
    pub fn pending_value(&self) -> f64 {
        match self {
            Resolution::Default(value) => *value,
            Resolution::Overridden { is_paid: true, .. } => 0.0,
            Resolution::Overridden { value, is_paid: false, .. } => *value,
        }
    }

    pub fn state(&self) -> MonthItemState {
        match self {
            Resolution::Default(_) => MonthItemState::Defaulted,
            Resolution::Overridden { is_paid: false, .. } => MonthItemState::RecordedUnpaid,
            Resolution::Overridden { is_paid: true, .. } => MonthItemState::RecordedPaid,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedItem {
    pub planning_id: String,
    pub category_name: String,
    pub resolution: Resolution,
    pub override_version: Option<u64>,
    pub paid_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub plan_type: PlanType,
    pub total: f64,
    pub pending_total: f64,
    pub paid_total: f64,
    pub items: Vec<PlannedItem>,
    pub warnings: Vec<PlanningWarning>,
}

/// A month summary without the per-item breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotals {
    pub month: MonthKey,
    pub plan_type: PlanType,
    pub total: f64,
    pub pending_total: f64,
    pub paid_total: f64,
    pub warnings: Vec<PlanningWarning>,
}

impl From<MonthlySummary> for MonthlyTotals {
    fn from(summary: MonthlySummary) -> Self {
        MonthlyTotals {
            month: summary.month,
            plan_type: summary.plan_type,
            total: summary.total,
            pending_total: summary.pending_total,
            paid_total: summary.paid_total,
            warnings: summary.warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearOverview {
    pub year: i32,
    pub plan_type: PlanType,
    pub months: Vec<MonthlySummary>,
    pub total: f64,
    pub pending_total: f64,
}

/// Read-only view over a catalog and an override store.
#[derive(Debug, Clone, Copy)]
pub struct AggregationEngine<'a> {
    catalog: &'a PlanningCatalog,
    overrides: &'a MonthlyOverrideStore,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(catalog: &'a PlanningCatalog, overrides: &'a MonthlyOverrideStore) -> Self {
        Self { catalog, overrides }
    }

    /// Resolve one definition for one month; only a default can fail.
    pub fn resolve(
        &self,
        definition: &PlanningDefinition,
        month: MonthKey,
    ) -> Result<Resolution, FormulaError> {
        match self.overrides.find(&definition.id, month) {
            Some(recorded) => Ok(Resolution::Overridden {
                override_id: recorded.id.clone(),
                value: recorded.value,
                is_paid: recorded.is_paid,
            }),
            None => self.catalog.default_value_for(definition).map(Resolution::Default),
        }
    }

    pub fn monthly_total(&self, month: MonthKey, plan_type: PlanType) -> f64 {
        self.monthly_summary(month, plan_type).total
    }

    pub fn monthly_pending_total(&self, month: MonthKey, plan_type: PlanType) -> f64 {
        self.monthly_summary(month, plan_type).pending_total
    }

    pub fn monthly_summary(&self, month: MonthKey, plan_type: PlanType) -> MonthlySummary {
        let mut items = Vec::new();
        let mut warnings = Vec::new();

        for definition in self.catalog.active_in_month(plan_type, month) {
            let resolution = match self.resolve(definition, month) {
                Ok(resolution) => resolution,
                Err(e) => {
                    warn!(
                        "Formula for '{}' ({}) failed in {}: {}",
                        definition.category_name, definition.id, month, e
                    );
                    warnings.push(PlanningWarning {
                        planning_id: definition.id.clone(),
                        category_name: definition.category_name.clone(),
                        message: e.to_string(),
                    });
                    Resolution::Default(0.0)
                }
            };

            let recorded = self.overrides.find(&definition.id, month);
            items.push(PlannedItem {
                planning_id: definition.id.clone(),
                category_name: definition.category_name.clone(),
                resolution,
                override_version: recorded.map(|o| o.version),
                paid_date: recorded.and_then(|o| o.paid_date),
            });
        }

        let total = items.iter().map(|i| i.resolution.value()).sum::<f64>();
        let pending_total = items.iter().map(|i| i.resolution.pending_value()).sum::<f64>();
        let paid_total = items
            .iter()
            .filter(|i| i.resolution.state() == MonthItemState::RecordedPaid)
            .map(|i| i.resolution.value())
            .sum::<f64>();

        MonthlySummary {
            month,
            plan_type,
            total,
            pending_total,
            paid_total,
            items,
            warnings,
        }
    }

    pub fn year_overview(&self, year: i32, plan_type: PlanType) -> Result<YearOverview, MonthKeyError> {
        let months = MonthKey::months_of_year(year)?
            .into_iter()
            .map(|month| self.monthly_summary(month, plan_type))
            .collect::<Vec<_>>();
        let total = months.iter().map(|m| m.total).sum::<f64>();
        let pending_total = months.iter().map(|m| m.pending_total).sum::<f64>();

        Ok(YearOverview {
            year,
            plan_type,
            months,
            total,
            pending_total,
        })
    }
}
