//! Conversions between domain types and the DTOs of the `shared` crate.

pub mod override_mapper;
pub mod planning_mapper;
pub mod summary_mapper;

pub use override_mapper::OverrideMapper;
pub use planning_mapper::PlanningMapper;
pub use summary_mapper::SummaryMapper;
