//! Completion statistics over a date window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habit::{is_task_day, longest_streak_between, Habit};

/// Summary of a habit's record inside an inclusive date window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Task days in the window.
    pub task_days: u32,
    /// Task days in the window that were completed.
    pub completed_task_days: u32,
    /// `completed_task_days / task_days`, 0.0 without task days.
    pub completion_rate: f64,
    /// Longest completed run inside the window.
    pub longest_streak: u32,
    /// Size of the whole completion history, window or not.
    pub total_completions: usize,
}

impl HabitStats {
    /// Task days in the window that were not completed. An open `to` day
    /// counts here too.
    pub fn missed_task_days(&self) -> u32 {
        self.task_days - self.completed_task_days
    }
}

/// Summarize `habit` over `from ..= to`. An inverted window is empty.
pub fn summarize(habit: &Habit, from: NaiveDate, to: NaiveDate) -> HabitStats {
    let (task_days, completed_task_days) = from
        .iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| is_task_day(habit, *d))
        .fold((0u32, 0u32), |(total, done), d| {
            (total + 1, done + u32::from(habit.is_completed_on(d)))
        });

    let completion_rate = if task_days == 0 {
        0.0
    } else {
        f64::from(completed_task_days) / f64::from(task_days)
    };

    HabitStats {
        from,
        to,
        task_days,
        completed_task_days,
        completion_rate,
        longest_streak: longest_streak_between(habit, from, to),
        total_completions: habit.completion_dates.len(),
    }
}
