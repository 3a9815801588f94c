//! # Storage Module
//!
//! Handles all data persistence for the planner.
//!
//! The domain layer only sees the traits in [`traits`]; the backends can be
//! swapped without touching it.
//!
//! ## Current Implementation
//!
//! - **CSV**: one data directory with a file per record type (default)
//! - **In-memory**: shared `Vec`s behind a mutex, for tests and throwaway sessions

pub mod csv;
pub mod memory;
pub mod traits;

pub use self::csv::CsvConnection;
pub use memory::InMemoryConnection;
pub use traits::{Connection, OverrideStorage, PlanningStorage};
