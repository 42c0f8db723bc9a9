mod config;
pub mod database;
mod memory;
pub mod migrations;

pub use config::{CalendarConfig, Config, DisplayConfig, ScheduleConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;
use crate::habit::Habit;

/// Persistence collaborator for habits.
///
/// Implementations must round-trip every habit field, including the full
/// completion date set.
pub trait HabitStore {
    /// All stored habits, oldest first.
    fn load_all_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// One habit by id.
    fn get(&self, id: &str) -> Result<Option<Habit>, StorageError>;

    /// Insert or replace a habit.
    fn save(&mut self, habit: &Habit) -> Result<(), StorageError>;

    /// Remove a habit and its history. Returns whether it existed.
    fn delete(&mut self, id: &str) -> Result<bool, StorageError>;
}

/// Returns the data directory.
///
/// `HABITKEEP_DATA_DIR` wins when set; otherwise `~/.config/habitkeep[-dev]/`
/// depending on `HABITKEEP_ENV`.
///
/// Set HABITKEEP_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("HABITKEEP_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HABITKEEP_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitkeep-dev")
            } else {
                base_dir.join("habitkeep")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
