//! # CSV Planning Repository
//!
//! Stores planning definitions in `{data_directory}/planning_definitions.csv`.
//!
//! ## CSV Format
//!
//! ```csv
//! id,plan_type,category_name,formula,base_value,end_month,created_at,updated_at
//! planning::5f0c...,PJ,INSS,(5000*28%)*27.5%,0,,2025-01-20T10:00:00Z,2025-01-20T10:00:00Z
//! planning::91ab...,PF,Rent,,1200,2025-12,2025-01-20T10:00:00Z,2025-01-20T10:00:00Z
//! ```
//!
//! Empty `formula` and `end_month` columns mean "not set".

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use shared::PlanType;

use super::connection::{CsvConnection, PLANNING_HEADER};
use crate::domain::models::{MonthKey, PlanningDefinition};
use crate::storage::traits::PlanningStorage;

/// CSV record structure for planning definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlanningRecord {
    id: String,
    plan_type: String,
    category_name: String,
    formula: String,
    base_value: f64,
    end_month: String,
    created_at: String,
    updated_at: String,
}

impl From<&PlanningDefinition> for PlanningRecord {
    fn from(definition: &PlanningDefinition) -> Self {
        PlanningRecord {
            id: definition.id.clone(),
            plan_type: definition.plan_type.code().to_string(),
            category_name: definition.category_name.clone(),
            formula: definition.formula.clone().unwrap_or_default(),
            base_value: definition.base_value,
            end_month: definition
                .end_month
                .map(|m| m.to_string())
                .unwrap_or_default(),
            created_at: definition.created_at.to_rfc3339(),
            updated_at: definition.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<PlanningRecord> for PlanningDefinition {
    type Error = anyhow::Error;

    fn try_from(record: PlanningRecord) -> Result<Self> {
        let plan_type = PlanType::from_code(&record.plan_type)
            .ok_or_else(|| anyhow!("Unknown plan type '{}'", record.plan_type))?;
        let end_month = if record.end_month.trim().is_empty() {
            None
        } else {
            Some(record.end_month.parse::<MonthKey>()?)
        };
        let formula = if record.formula.trim().is_empty() {
            None
        } else {
            Some(record.formula)
        };

        Ok(PlanningDefinition {
            id: record.id,
            plan_type,
            category_name: record.category_name,
            formula,
            base_value: record.base_value,
            end_month,
            created_at: parse_timestamp(&record.created_at)?,
            updated_at: parse_timestamp(&record.updated_at)?,
        })
    }
}

pub(super) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(|e| anyhow!("Invalid timestamp '{}': {}", raw, e))?
        .with_timezone(&Utc))
}

/// CSV-based planning definition repository
#[derive(Clone)]
pub struct PlanningRepository {
    connection: CsvConnection,
}

impl PlanningRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_definitions(&self) -> Result<Vec<PlanningDefinition>> {
        let path = self.connection.planning_file_path();
        let records: Vec<PlanningRecord> = self.connection.read_records(&path, PLANNING_HEADER)?;

        let mut definitions = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match PlanningDefinition::try_from(record) {
                Ok(definition) => definitions.push(definition),
                Err(e) => {
                    warn!("Failed to parse planning record {}: {}. Skipping.", id, e);
                    continue;
                }
            }
        }
        Ok(definitions)
    }

    fn write_definitions(&self, definitions: &[PlanningDefinition]) -> Result<()> {
        let path = self.connection.planning_file_path();
        let records: Vec<PlanningRecord> = definitions.iter().map(PlanningRecord::from).collect();
        self.connection.write_records(&path, PLANNING_HEADER, &records)
    }
}

#[async_trait]
impl PlanningStorage for PlanningRepository {
    async fn store_definition(&self, definition: &PlanningDefinition) -> Result<()> {
        info!("Storing planning definition in CSV: {}", definition.id);

        let mut definitions = self.read_definitions()?;
        if definitions.iter().any(|d| d.id == definition.id) {
            return Err(anyhow!("Planning definition already exists: {}", definition.id));
        }
        definitions.push(definition.clone());
        self.write_definitions(&definitions)
    }

    async fn get_definition(&self, planning_id: &str) -> Result<Option<PlanningDefinition>> {
        Ok(self
            .read_definitions()?
            .into_iter()
            .find(|d| d.id == planning_id))
    }

    async fn list_definitions(&self, plan_type: Option<PlanType>) -> Result<Vec<PlanningDefinition>> {
        Ok(self
            .read_definitions()?
            .into_iter()
            .filter(|d| plan_type.map_or(true, |t| d.plan_type == t))
            .collect())
    }

    async fn update_definition(&self, definition: &PlanningDefinition) -> Result<()> {
        info!("Updating planning definition in CSV: {}", definition.id);

        let mut definitions = self.read_definitions()?;
        let existing = definitions
            .iter_mut()
            .find(|d| d.id == definition.id)
            .ok_or_else(|| anyhow!("Planning definition not found: {}", definition.id))?;
        *existing = definition.clone();
        self.write_definitions(&definitions)
    }

    async fn delete_definition(&self, planning_id: &str) -> Result<bool> {
        let mut definitions = self.read_definitions()?;
        let before = definitions.len();
        definitions.retain(|d| d.id != planning_id);
        if definitions.len() == before {
            return Ok(false);
        }
        self.write_definitions(&definitions)?;
        info!("Deleted planning definition from CSV: {}", planning_id);
        Ok(true)
    }
}
