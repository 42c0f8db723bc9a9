//! # habitkeep Core Library
//!
//! Scheduling and streak engine for habit tracking. The engine is a set of
//! pure functions over a [`Habit`] value: callers pass in "today" from a
//! [`Clock`], get an updated habit back, and persist it through a
//! [`HabitStore`] as a separate step.
//!
//! ## Key Components
//!
//! - [`habit::schedule`]: whether a date is a task day, and the next one
//! - [`habit::streak`]: current/best streak, completion toggle, day rollover
//! - [`storage`]: SQLite and in-memory stores, TOML configuration
//! - [`service`]: store-backed toggle and batch rollover
//! - [`stats`]: completion statistics over a date window

pub mod clock;
pub mod error;
pub mod habit;
pub mod service;
pub mod stats;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use habit::{
    check_and_reset_for_new_day, is_task_day, next_task_day_on_or_after, toggle_completion,
    CustomSchedule, Frequency, Habit, HabitType, ScheduleType,
};
pub use service::{add_habit, rollover_all, toggle_and_save, RolloverReport};
pub use stats::{summarize, HabitStats};
pub use storage::{Config, HabitStore, MemoryStore, SqliteStore};
