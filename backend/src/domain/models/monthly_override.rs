//! Domain model for a per-month recorded value.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::month::MonthKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyOverride {
    pub id: String,
    pub planning_id: String,
    pub month: MonthKey,
    pub value: f64,
    pub is_paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
    /// Starts at 1, bumped on every mutation
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MonthlyOverride {
    pub fn generate_id() -> String {
        format!("override::{}", Uuid::new_v4())
    }

    /// A fresh, unpaid override.
    pub fn new(planning_id: &str, month: MonthKey, value: f64, now: DateTime<Utc>) -> Self {
        Self {
            id: Self::generate_id(),
            planning_id: planning_id.to_string(),
            month,
            value,
            is_paid: false,
            paid_date: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_value(&mut self, value: f64, now: DateTime<Utc>) {
        self.value = value;
        self.touch(now);
    }

    /// `paid_date` is stamped only on the unpaid -> paid transition and
    /// cleared on the way back.
    pub fn set_paid(&mut self, is_paid: bool, now: DateTime<Utc>) {
        if is_paid && !self.is_paid {
            self.paid_date = Some(now);
        } else if !is_paid {
            self.paid_date = None;
        }
        self.is_paid = is_paid;
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }
}
