//! # CSV Storage Module
//!
//! File-based storage for planning data. Everything lives in one data
//! directory:
//!
//! ```text
//! data/
//! ├── planning_definitions.csv
//! └── monthly_overrides.csv
//! ```
//!
//! Files are created with their header on first access and always rewritten
//! whole through a temp file and rename.

pub mod connection;
pub mod override_repository;
pub mod planning_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use override_repository::OverrideRepository;
pub use planning_repository::PlanningRepository;
