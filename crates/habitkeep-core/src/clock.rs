//! Calendar-day provider.
//!
//! The engine never reads the wall clock itself. Callers obtain "today"
//! from a [`Clock`], which is also the single place where an instant is
//! turned into a calendar day.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

use crate::error::ConfigError;
use crate::storage::CalendarConfig;

/// Source of the current calendar day.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the local timezone or a fixed UTC offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// Day boundaries follow the system timezone.
    pub fn local() -> Self {
        Self { offset: None }
    }

    /// Day boundaries follow a fixed offset east of UTC.
    ///
    /// # Errors
    /// Returns an error if the offset is a day or more away from UTC.
    pub fn with_offset_minutes(minutes: i32) -> Result<Self, ConfigError> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "calendar.utc_offset_minutes".into(),
                message: format!("{minutes} is not a valid UTC offset"),
            })?;
        Ok(Self {
            offset: Some(offset),
        })
    }

    /// Build from the `[calendar]` config section.
    ///
    /// # Errors
    /// Returns an error if the configured offset is out of range.
    pub fn from_config(config: &CalendarConfig) -> Result<Self, ConfigError> {
        match config.utc_offset_minutes {
            Some(minutes) => Self::with_offset_minutes(minutes),
            None => Ok(Self::local()),
        }
    }

    /// Calendar day an instant falls on for this clock.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self.offset {
            Some(offset) => instant.with_timezone(&offset).date_naive(),
            None => instant.with_timezone(&Local).date_naive(),
        }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        self.day_of(Utc::now())
    }
}

/// Clock pinned to one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
