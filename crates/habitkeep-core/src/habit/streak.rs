//! Schedule-aware streak calculation.
//!
//! A streak counts consecutive *task days* that were completed, walking
//! backwards from today. Days the schedule does not ask for are skipped
//! without breaking the run. Today is still open: an uncompleted task day
//! today does not end the streak, only a missed task day before today does.
//!
//! All operations take the reference date explicitly and return an
//! updated copy of the habit; persisting it is up to the caller.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::model::Habit;
use super::schedule::is_task_day;

/// Number of consecutive completed task days ending today (or at the most
/// recent task day before today, while today is still open).
///
/// Completion dates after `today` and completions on non-task days are
/// ignored.
pub fn current_streak(habit: &Habit, today: NaiveDate) -> u32 {
    // Past the earliest completion every task day is a miss.
    let Some(&earliest) = habit.completion_dates.first() else {
        return 0;
    };

    let mut streak = 0;
    let mut day = today;
    while day >= earliest {
        if is_task_day(habit, day) {
            if habit.completion_dates.contains(&day) {
                streak += 1;
            } else if day != today {
                break;
            }
        }
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive completed task days inside `from ..= to`.
pub fn longest_streak_between(habit: &Habit, from: NaiveDate, to: NaiveDate) -> u32 {
    let mut best = 0;
    let mut run = 0;
    for day in from.iter_days().take_while(|d| *d <= to) {
        if !is_task_day(habit, day) {
            continue;
        }
        if habit.completion_dates.contains(&day) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

/// Refresh the derived fields (`is_completed`, `last_completed_date`,
/// `current_streak`, `best_streak`) against `today`.
///
/// `best_streak` never decreases.
pub fn recompute(habit: &Habit, today: NaiveDate) -> Habit {
    let mut next = habit.clone();
    refresh(&mut next, today);
    next
}

fn refresh(habit: &mut Habit, today: NaiveDate) {
    habit.is_completed = is_task_day(habit, today) && habit.is_completed_on(today);
    habit.last_completed_date = habit.completion_dates.last().copied();
    habit.current_streak = current_streak(habit, today);
    habit.best_streak = habit.best_streak.max(habit.current_streak);
    debug!(
        habit_id = %habit.id,
        %today,
        current = habit.current_streak,
        best = habit.best_streak,
        "recomputed streak"
    );
}

/// Mark or unmark `today` as completed.
///
/// Outside a task day this returns the habit unchanged. Otherwise the day
/// rollover check runs first, then the completion flag flips, the
/// completion set follows it and streaks are recomputed.
pub fn toggle_completion(habit: &Habit, today: NaiveDate) -> Habit {
    if !is_task_day(habit, today) {
        debug!(habit_id = %habit.id, %today, "toggle ignored on non-task day");
        return habit.clone();
    }

    let mut next = check_and_reset_for_new_day(habit, today);
    next.is_completed = !next.is_completed;
    if next.is_completed {
        next.completion_dates.insert(today);
    } else {
        next.completion_dates.remove(&today);
    }
    refresh(&mut next, today);
    if next.is_completed {
        next.last_completed_date = Some(today);
    }

    info!(
        habit_id = %next.id,
        %today,
        completed = next.is_completed,
        current = next.current_streak,
        best = next.best_streak,
        "toggled completion"
    );
    next
}

/// Day rollover: when `today` differs from the last processed day, clear
/// the completion flag and recompute streaks for the new day.
///
/// Calling this again on the same day changes nothing.
pub fn check_and_reset_for_new_day(habit: &Habit, today: NaiveDate) -> Habit {
    let mut next = habit.clone();
    match habit.last_reset_date {
        None => next.last_reset_date = Some(today),
        Some(last) if last == today => {}
        Some(last) => {
            next.last_reset_date = Some(today);
            // is_completed is re-derived; false unless today is already recorded.
            refresh(&mut next, today);
            info!(
                habit_id = %next.id,
                from = %last,
                to = %today,
                current = next.current_streak,
                "rolled over to new day"
            );
        }
    }
    next
}
