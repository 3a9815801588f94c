//! # CSV Monthly Override Repository
//!
//! Stores monthly overrides in `{data_directory}/monthly_overrides.csv`,
//! one row per (planning id, month) pair.
//!
//! ```csv
//! id,planning_id,month,value,is_paid,paid_date,version,created_at,updated_at
//! override::77e1...,planning::5f0c...,2025-01,400,true,2025-02-05T09:12:00Z,3,2025-01-20T10:00:00Z,2025-02-05T09:12:00Z
//! ```

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::connection::{CsvConnection, OVERRIDES_HEADER};
use super::planning_repository::parse_timestamp;
use crate::domain::models::{MonthKey, MonthlyOverride};
use crate::storage::traits::OverrideStorage;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OverrideRecord {
    id: String,
    planning_id: String,
    month: String,
    value: f64,
    is_paid: bool,
    paid_date: String,
    version: u64,
    created_at: String,
    updated_at: String,
}

impl From<&MonthlyOverride> for OverrideRecord {
    fn from(o: &MonthlyOverride) -> Self {
        OverrideRecord {
            id: o.id.clone(),
            planning_id: o.planning_id.clone(),
            month: o.month.to_string(),
            value: o.value,
            is_paid: o.is_paid,
            paid_date: o.paid_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            version: o.version,
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<OverrideRecord> for MonthlyOverride {
    type Error = anyhow::Error;

    fn try_from(record: OverrideRecord) -> Result<Self> {
        let paid_date = if record.paid_date.trim().is_empty() {
            None
        } else {
            Some(parse_timestamp(&record.paid_date)?)
        };

        Ok(MonthlyOverride {
            id: record.id,
            planning_id: record.planning_id,
            month: record.month.parse::<MonthKey>()?,
            value: record.value,
            is_paid: record.is_paid,
            paid_date,
            version: record.version,
            created_at: parse_timestamp(&record.created_at)?,
            updated_at: parse_timestamp(&record.updated_at)?,
        })
    }
}

/// CSV-based monthly override repository
#[derive(Clone)]
pub struct OverrideRepository {
    connection: CsvConnection,
}

impl OverrideRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_overrides(&self) -> Result<Vec<MonthlyOverride>> {
        let path = self.connection.overrides_file_path();
        let records: Vec<OverrideRecord> = self.connection.read_records(&path, OVERRIDES_HEADER)?;

        let mut overrides = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match MonthlyOverride::try_from(record) {
                Ok(o) => overrides.push(o),
                Err(e) => warn!("Failed to parse override record {}: {}. Skipping.", id, e),
            }
        }
        Ok(overrides)
    }

    fn write_overrides(&self, overrides: &[MonthlyOverride]) -> Result<()> {
        let path = self.connection.overrides_file_path();
        let records: Vec<OverrideRecord> = overrides.iter().map(OverrideRecord::from).collect();
        self.connection.write_records(&path, OVERRIDES_HEADER, &records)
    }
}

#[async_trait]
impl OverrideStorage for OverrideRepository {
    async fn store_override(&self, monthly_override: &MonthlyOverride) -> Result<()> {
        info!(
            "Storing override {} ({} / {}) in CSV",
            monthly_override.id, monthly_override.planning_id, monthly_override.month
        );

        let mut overrides = self.read_overrides()?;
        if overrides.iter().any(|o| {
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

        match overrides.iter_mut().find(|o| o.id == monthly_override.id) {
            Some(existing) => *existing = monthly_override.clone(),
            None => overrides.push(monthly_override.clone()),
        }
        self.write_overrides(&overrides)
    }

    async fn get_override(&self, override_id: &str) -> Result<Option<MonthlyOverride>> {
        Ok(self
            .read_overrides()?
            .into_iter()
            .find(|o| o.id == override_id))
    }

    async fn find_override(&self, planning_id: &str, month: MonthKey) -> Result<Option<MonthlyOverride>> {
        Ok(self
            .read_overrides()?
            .into_iter()
            .find(|o| o.planning_id == planning_id && o.month == month))
    }

    async fn list_overrides(&self, planning_id: Option<&str>) -> Result<Vec<MonthlyOverride>> {
        Ok(self
            .read_overrides()?
            .into_iter()
            .filter(|o| planning_id.map_or(true, |id| o.planning_id == id))
            .collect())
    }

    async fn delete_overrides_for_definition(&self, planning_id: &str) -> Result<u32> {
        let mut overrides = self.read_overrides()?;
        let before = overrides.len();
        overrides.retain(|o| o.planning_id != planning_id);
        let removed = (before - overrides.len()) as u32;
        if removed > 0 {
            self.write_overrides(&overrides)?;
            info!("Deleted {} overrides of {} from CSV", removed, planning_id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::Utc;

    fn month(raw: &str) -> MonthKey {
        raw.parse().unwrap()
    }

    #[tokio::test]
    async fn test_store_update_and_find() -> Result<()> {
        let env = TestEnvironment::new().await?;
        let repo = OverrideRepository::new(env.connection.clone());

        let mut record = MonthlyOverride::new("planning::a", month("2025-01"), 400.0, Utc::now());
        repo.store_override(&record).await?;
        record.set_paid(true, Utc::now());
        repo.store_override(&record).await?;

        let loaded = repo
            .find_override("planning::a", month("2025-01"))
            .await?
            .expect("override should exist");
        assert_eq!(loaded.id, record.id);
        assert!(loaded.is_paid);
        assert!(loaded.paid_date.is_some());
        assert_eq!(loaded.version, 2);
        assert_eq!(repo.list_overrides(None).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_second_override_for_same_month_is_rejected() -> Result<()> {
        let env = TestEnvironment::new().await?;
        let repo = OverrideRepository::new(env.connection.clone());

        let first = MonthlyOverride::new("planning::a", month("2025-01"), 1.0, Utc::now());
        let duplicate = MonthlyOverride::new("planning::a", month("2025-01"), 2.0, Utc::now());
        repo.store_override(&first).await?;

        assert!(repo.store_override(&duplicate).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_delete_by_definition() -> Result<()> {
        let env = TestEnvironment::new().await?;
        let repo = OverrideRepository::new(env.connection.clone());
        for (planning_id, m) in [("planning::a", "2025-01"), ("planning::a", "2025-02"), ("planning::b", "2025-01")] {
            repo.store_override(&MonthlyOverride::new(planning_id, month(m), 10.0, Utc::now()))
                .await?;
        }

        assert_eq!(repo.list_overrides(Some("planning::a")).await?.len(), 2);
        assert_eq!(repo.delete_overrides_for_definition("planning::a").await?, 2);
        assert_eq!(repo.delete_overrides_for_definition("planning::a").await?, 0);
        assert_eq!(repo.list_overrides(None).await?.len(), 1);
        Ok(())
    }
}
