//! Store-backed operations: the pure engine plus the explicit save step.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{CoreError, Result};
use crate::habit::{check_and_reset_for_new_day, recompute, toggle_completion, Habit};
use crate::storage::HabitStore;

/// Outcome of a batch rollover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RolloverReport {
    /// Habits looked at.
    pub checked: usize,
    /// Habits whose state changed and were saved.
    pub updated: usize,
    /// Ids of habits whose save failed.
    pub failed: Vec<String>,
}

/// Run the day rollover for every stored habit.
///
/// Habits are independent: a failed save is logged and recorded in the
/// report, and the remaining habits are still processed.
///
/// # Errors
/// Returns an error only if the habits cannot be loaded.
pub fn rollover_all<S: HabitStore + ?Sized>(
    store: &mut S,
    today: NaiveDate,
) -> Result<RolloverReport> {
    let habits = store.load_all_habits()?;
    let mut report = RolloverReport::default();

    for habit in habits {
        report.checked += 1;
        let next = check_and_reset_for_new_day(&habit, today);
        if next == habit {
            continue;
        }
        match store.save(&next) {
            Ok(()) => report.updated += 1,
            Err(e) => {
                warn!(habit_id = %next.id, error = %e, "failed to save habit after rollover");
                report.failed.push(next.id);
            }
        }
    }

    info!(
        %today,
        checked = report.checked,
        updated = report.updated,
        failed = report.failed.len(),
        "rollover complete"
    );
    Ok(report)
}

/// Load a habit, toggle today's completion, and save it if anything changed.
///
/// # Errors
/// Returns `HabitNotFound` for an unknown id, or the store's error.
pub fn toggle_and_save<S: HabitStore + ?Sized>(
    store: &mut S,
    id: &str,
    today: NaiveDate,
) -> Result<Habit> {
    let habit = store
        .get(id)?
        .ok_or_else(|| CoreError::HabitNotFound(id.to_string()))?;
    let next = toggle_completion(&habit, today);
    if next != habit {
        store.save(&next)?;
    }
    Ok(next)
}

/// Validate a new habit, initialise its derived state for `today`, and
/// save it.
///
/// # Errors
/// Returns a validation error for a malformed habit, or the store's error.
pub fn add_habit<S: HabitStore + ?Sized>(
    store: &mut S,
    habit: Habit,
    today: NaiveDate,
) -> Result<Habit> {
    habit.validate()?;
    let habit = check_and_reset_for_new_day(&recompute(&habit, today), today);
    store.save(&habit)?;
    info!(habit_id = %habit.id, name = %habit.name, "added habit");
    Ok(habit)
}
