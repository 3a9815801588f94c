//! Calendar month value type used as the key of every monthly computation.
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A year + month with no day component, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MonthKeyError {
    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidFormat(String),
    #[error("Month out of range in '{0}': must be 01-12")]
    MonthOutOfRange(String),
    #[error("Year out of range in '{0}': must be 0001-9999")]
    YearOutOfRange(String),
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        let label = format!("{:04}-{:02}", year, month);
        if !(1..=12).contains(&month) {
            return Err(MonthKeyError::MonthOutOfRange(label));
        }
        if !(1..=9999).contains(&year) {
            return Err(MonthKeyError::YearOutOfRange(label));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// All twelve months of a calendar year, January first.
    pub fn months_of_year(year: i32) -> Result<Vec<Self>, MonthKeyError> {
        (1..=12).map(|month| Self::new(year, month)).collect()
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    /// Accepts `YYYY-MM`, and `YYYY-MM-DD` with the day discarded.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        let parts: Vec<&str> = text.split('-').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(MonthKeyError::InvalidFormat(raw.to_string()));
        }
        let digits = |part: &str, len: usize| part.len() == len && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(parts[0], 4) || !digits(parts[1], 2) {
            return Err(MonthKeyError::InvalidFormat(raw.to_string()));
        }
        if parts.len() == 3
            && (!digits(parts[2], 2) || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err())
        {
            return Err(MonthKeyError::InvalidFormat(raw.to_string()));
        }
        let year = parts[0]
            .parse::<i32>()
            .map_err(|_| MonthKeyError::InvalidFormat(raw.to_string()))?;
        let month = parts[1]
            .parse::<u32>()
            .map_err(|_| MonthKeyError::InvalidFormat(raw.to_string()))?;
        Self::new(year, month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
