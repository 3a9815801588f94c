//! In-memory storage backend, used by tests and for ephemeral sessions.
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::PlanType;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::models::{MonthKey, MonthlyOverride, PlanningDefinition};
use crate::storage::traits::{Connection, OverrideStorage, PlanningStorage};

#[derive(Debug, Default)]
struct MemoryState {
    definitions: Vec<PlanningDefinition>,
    overrides: Vec<MonthlyOverride>,
}

/// Shared in-memory state; clones see the same data.
#[derive(Clone, Default)]
pub struct InMemoryConnection {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("In-memory storage lock poisoned"))
    }
}

impl Connection for InMemoryConnection {
    type PlanningRepository = InMemoryPlanningRepository;
    type OverrideRepository = InMemoryOverrideRepository;

    fn create_planning_repository(&self) -> Self::PlanningRepository {
        InMemoryPlanningRepository { connection: self.clone() }
    }

    fn create_override_repository(&self) -> Self::OverrideRepository {
        InMemoryOverrideRepository { connection: self.clone() }
    }
}

#[derive(Clone)]
pub struct InMemoryPlanningRepository {
    connection: InMemoryConnection,
}

#[async_trait]
impl PlanningStorage for InMemoryPlanningRepository {
    async fn store_definition(&self, definition: &PlanningDefinition) -> Result<()> {
        let mut state = self.connection.lock()?;
        if state.definitions.iter().any(|d| d.id == definition.id) {
            return Err(anyhow!("Planning definition already exists: {}", definition.id));
        }
        state.definitions.push(definition.clone());
        Ok(())
    }

    async fn get_definition(&self, planning_id: &str) -> Result<Option<PlanningDefinition>> {
        let state = self.connection.lock()?;
        Ok(state.definitions.iter().find(|d| d.id == planning_id).cloned())
    }

    async fn list_definitions(&self, plan_type: Option<PlanType>) -> Result<Vec<PlanningDefinition>> {
        let state = self.connection.lock()?;
        Ok(state
            .definitions
            .iter()
            .filter(|d| plan_type.map_or(true, |t| d.plan_type == t))
            .cloned()
            .collect())
    }

    async fn update_definition(&self, definition: &PlanningDefinition) -> Result<()> {
        let mut state = self.connection.lock()?;
        let existing = state
            .definitions
            .iter_mut()
            .find(|d| d.id == definition.id)
            .ok_or_else(|| anyhow!("Planning definition not found: {}", definition.id))?;
        *existing = definition.clone();
        Ok(())
    }

    async fn delete_definition(&self, planning_id: &str) -> Result<bool> {
        let mut state = self.connection.lock()?;
        let before = state.definitions.len();
        state.definitions.retain(|d| d.id != planning_id);
        Ok(state.definitions.len() < before)
    }
}

#[derive(Clone)]
pub struct InMemoryOverrideRepository {
    connection: InMemoryConnection,
}

#[async_trait]
impl OverrideStorage for InMemoryOverrideRepository {
    async fn store_override(&self, monthly_override: &MonthlyOverride) -> Result<()> {
        let mut state = self.connection.lock()?;
        if state.overrides.iter().any(|o| {
            o.id != monthly_override.id
                && o.planning_id == monthly_override.planning_id
                && o.month == monthly_override.month
        }) {
            return Err(anyhow!(
                "An override for {} in {} already exists",
                monthly_override.planning_id,
                monthly_override.month
            ));
        }
        match state.overrides.iter_mut().find(|o| o.id == monthly_override.id) {
            Some(existing) => *existing = monthly_override.clone(),
            None => state.overrides.push(monthly_override.clone()),
        }
        Ok(())
    }

    async fn get_override(&self, override_id: &str) -> Result<Option<MonthlyOverride>> {
        let state = self.connection.lock()?;
        Ok(state.overrides.iter().find(|o| o.id == override_id).cloned())
    }

    async fn find_override(&self, planning_id: &str, month: MonthKey) -> Result<Option<MonthlyOverride>> {
        let state = self.connection.lock()?;
        Ok(state
            .overrides
            .iter()
            .find(|o| o.planning_id == planning_id && o.month == month)
            .cloned())
    }

    async fn list_overrides(&self, planning_id: Option<&str>) -> Result<Vec<MonthlyOverride>> {
        let state = self.connection.lock()?;
        Ok(state
            .overrides
            .iter()
            .filter(|o| planning_id.map_or(true, |id| o.planning_id == id))
            .cloned()
            .collect())
    }

    async fn delete_overrides_for_definition(&self, planning_id: &str) -> Result<u32> {
        let mut state = self.connection.lock()?;
        let before = state.overrides.len();
        state.overrides.retain(|o| o.planning_id != planning_id);
        Ok((before - state.overrides.len()) as u32)
    }
}
