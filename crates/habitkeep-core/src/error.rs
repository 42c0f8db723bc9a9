//! Core error types for habitkeep-core.
//!
//! The scheduling and streak engine itself is total over well-formed
//! habits and never returns these. They come from construction-time
//! validation, persistence, and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitkeep-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No habit stored under the given id
    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence errors raised by a [`crate::storage::HabitStore`].
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored row could not be turned back into a habit
    #[error("Corrupt record for habit '{id}': {message}")]
    CorruptRecord { id: String, message: String },

    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors for habit and schedule construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Habit name is empty or whitespace
    #[error("Habit name must not be empty")]
    EmptyName,

    /// Weekly frequency selected without any weekday
    #[error("Weekly habits need at least one task day")]
    NoTaskDays,

    /// Weekday number outside Sunday=1..Saturday=7
    #[error("Invalid weekday {0}: expected 1 (Sunday) through 7 (Saturday)")]
    InvalidWeekday(u8),

    /// Custom frequency selected without a custom schedule
    #[error("Custom frequency requires a custom schedule")]
    MissingCustomSchedule,

    /// Days-of-month schedule with no days
    #[error("Days-of-month schedule needs at least one day")]
    NoDaysOfMonth,

    /// Day of month outside 1..=31
    #[error("Invalid day of month {0}: expected 1 through 31")]
    InvalidDayOfMonth(u8),

    /// Interval schedule with a zero interval
    #[error("Interval must be at least 1 day")]
    ZeroInterval,
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_readable() {
        assert_eq!(
            ValidationError::InvalidWeekday(9).to_string(),
            "Invalid weekday 9: expected 1 (Sunday) through 7 (Saturday)"
        );
        assert_eq!(
            ValidationError::ZeroInterval.to_string(),
            "Interval must be at least 1 day"
        );
    }

    #[test]
    fn rusqlite_errors_map_to_query_failed() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StorageError::QueryFailed(_)));
    }

    #[test]
    fn core_error_wraps_validation() {
        let err: CoreError = ValidationError::EmptyName.into();
        assert_eq!(err.to_string(), "Validation error: Habit name must not be empty");
    }
}
