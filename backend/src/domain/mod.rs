//! # Domain Module
//!
//! Business rules of the planner.
//!
//! - [`formula`]: evaluator for default-value formulas (`3000-6%`, `(5000*28%)*27.5%`)
//! - [`planning_catalog`]: which definitions apply in a month and what they default to
//! - [`override_store`]: values recorded for a specific month and their paid flags
//! - [`aggregation`]: monthly and yearly totals over a catalog and an override store
//! - [`planning_service`]: async orchestration over storage, used by the REST layer
//!
//! Everything except the service is synchronous computation over an
//! in-memory snapshot.

pub mod aggregation;
pub mod commands;
pub mod errors;
pub mod formula;
pub mod models;
pub mod override_store;
pub mod planning_catalog;
pub mod planning_service;

pub use aggregation::{AggregationEngine, MonthlySummary, MonthlyTotals, PlannedItem, Resolution, YearOverview};
pub use errors::{PlanningError, PlanningResult};
pub use formula::{FormulaError, FormulaErrorKind, FormulaEvaluator};
pub use override_store::{MonthlyOverrideStore, OverrideNotFound};
pub use planning_catalog::PlanningCatalog;
pub use planning_service::PlanningService;
