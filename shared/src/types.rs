//! Common types used across the platform

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Seasonal context derived from a calendar date
///
/// Winter is December through March, summer is June through September.
/// The remaining months are shoulder months where both flags are false.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CalendarContext {
    pub is_winter: bool,
    pub is_summer: bool,
}

impl CalendarContext {
    /// Derive the context from a 1-based month number
    pub fn from_month(month: u32) -> Self {
        Self {
            is_winter: matches!(month, 12 | 1..=3),
            is_summer: (6..=9).contains(&month),
        }
    }

    /// Derive the context from a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }

    pub fn summer() -> Self {
        Self::from_month(7)
    }

    pub fn winter() -> Self {
        Self::from_month(1)
    }

    /// A shoulder-month context (neither winter nor summer)
    pub fn shoulder() -> Self {
        Self::default()
    }
}

/// Row layout used when projecting a payload to CSV
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CsvLayout {
    /// One row per distinct timestamp, merged by timestamp key
    #[default]
    Keyed,
    /// Timestamps from the first parameter, values paired by index
    Positional,
}
