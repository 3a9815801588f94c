//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use shared::PlanType;

use crate::domain::models::{MonthKey, MonthlyOverride, PlanningDefinition};

/// Trait defining the interface for planning definition storage
#[async_trait]
pub trait PlanningStorage: Send + Sync {
    /// Store a new definition
    async fn store_definition(&self, definition: &PlanningDefinition) -> Result<()>;

    /// Retrieve a definition by ID
    async fn get_definition(&self, planning_id: &str) -> Result<Option<PlanningDefinition>>;

    /// List definitions in insertion order, optionally restricted to one plan type
    async fn list_definitions(&self, plan_type: Option<PlanType>) -> Result<Vec<PlanningDefinition>>;

    /// Replace an existing definition
    async fn update_definition(&self, definition: &PlanningDefinition) -> Result<()>;

    /// Delete a definition
    /// Returns true if the definition was found and deleted
    async fn delete_definition(&self, planning_id: &str) -> Result<bool>;
}

/// Trait defining the interface for monthly override storage
#[async_trait]
pub trait OverrideStorage: Send + Sync {
    /// Insert the override, or replace the stored one with the same ID
    async fn store_override(&self, monthly_override: &MonthlyOverride) -> Result<()>;

    /// Retrieve an override by ID
    async fn get_override(&self, override_id: &str) -> Result<Option<MonthlyOverride>>;

    /// Retrieve the override recorded for a definition in a month
    async fn find_override(&self, planning_id: &str, month: MonthKey) -> Result<Option<MonthlyOverride>>;

    /// List overrides, optionally only those of one definition
    async fn list_overrides(&self, planning_id: Option<&str>) -> Result<Vec<MonthlyOverride>>;

    /// Delete all overrides of a definition
    /// Returns the number of overrides removed
    async fn delete_overrides_for_definition(&self, planning_id: &str) -> Result<u32>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type (in-memory, CSV, etc.)
/// and provides factory methods for creating repositories.
pub trait Connection: Send + Sync + Clone + 'static {
    type PlanningRepository: PlanningStorage + Clone + 'static;
    type OverrideRepository: OverrideStorage + Clone + 'static;

    fn create_planning_repository(&self) -> Self::PlanningRepository;

    fn create_override_repository(&self) -> Self::OverrideRepository;
}
