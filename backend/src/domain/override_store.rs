//! Per-(definition, month) recorded values and payment flags.
use chrono::{DateTime, Utc};

use crate::domain::models::{MonthKey, MonthlyOverride};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Monthly override not found: {0}")]
pub struct OverrideNotFound(pub String);

/// In-memory snapshot of monthly overrides.
///
/// Holds at most one override per (planning id, month); `upsert` mutates the
/// existing record instead of adding a second one.
#[derive(Debug, Clone, Default)]
pub struct MonthlyOverrideStore {
    overrides: Vec<MonthlyOverride>,
}

impl MonthlyOverrideStore {
    /// Build from persisted records. Should storage ever hold duplicates for a
    /// pair, the most recently updated one wins.
    pub fn new(records: Vec<MonthlyOverride>) -> Self {
        let mut store = Self::default();
        for record in records {
            match store
                .overrides
                .iter_mut()
                .find(|o| o.planning_id == record.planning_id && o.month == record.month)
            {
                Some(existing) if existing.updated_at < record.updated_at => *existing = record,
                Some(_) => {}
                None => store.overrides.push(record),
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn find(&self, planning_id: &str, month: MonthKey) -> Option<&MonthlyOverride> {
        self.overrides
            .iter()
            .find(|o| o.planning_id == planning_id && o.month == month)
    }

    pub fn upsert(&mut self, planning_id: &str, month: MonthKey, value: f64) -> &MonthlyOverride {
        self.upsert_at(planning_id, month, value, Utc::now())
    }

    pub fn upsert_at(
        &mut self,
        planning_id: &str,
        month: MonthKey,
        value: f64,
        now: DateTime<Utc>,
    ) -> &MonthlyOverride {
        let position = self
            .overrides
            .iter()
            .position(|o| o.planning_id == planning_id && o.month == month);
        let index = match position {
            Some(index) => {
                self.overrides[index].set_value(value, now);
                index
            }
            None => {
                self.overrides
                    .push(MonthlyOverride::new(planning_id, month, value, now));
                self.overrides.len() - 1
            }
        };
        &self.overrides[index]
    }

    pub fn set_paid(&mut self, override_id: &str, is_paid: bool) -> Result<&MonthlyOverride, OverrideNotFound> {
        self.set_paid_at(override_id, is_paid, Utc::now())
    }

    pub fn set_paid_at(
        &mut self,
        override_id: &str,
        is_paid: bool,
        now: DateTime<Utc>,
    ) -> Result<&MonthlyOverride, OverrideNotFound> {
        let record = self
            .overrides
            .iter_mut()
            .find(|o| o.id == override_id)
            .ok_or_else(|| OverrideNotFound(override_id.to_string()))?;
        record.set_paid(is_paid, now);
        Ok(&*record)
    }

    /// Drop every override of a definition, returning how many were removed.
    pub fn remove_for_definition(&mut self, planning_id: &str) -> usize {
        let before = self.overrides.len();
        self.overrides.retain(|o| o.planning_id != planning_id);
        before - self.overrides.len()
    }
}
