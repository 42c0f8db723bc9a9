//! Task-day evaluation.
//!
//! Decides whether a calendar day is one on which a habit's schedule calls
//! for action. Evaluation is total: malformed configuration (a custom
//! habit without a schedule, a zero interval) yields "not a task day"
//! instead of an error. Validation belongs to construction time, see
//! [`Habit::validate`].

use chrono::{Datelike, NaiveDate};

use super::model::{weekday_number, CustomSchedule, Frequency, Habit};

/// `num_days_from_ce()` of 1970-01-01, day zero for interval schedules.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Whole days from 1970-01-01 to `date`; negative before the epoch.
pub fn days_since_epoch(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
}

/// Whether `date` is a task day for `habit`.
///
/// Works for any date, past or future.
pub fn is_task_day(habit: &Habit, date: NaiveDate) -> bool {
    match habit.frequency {
        Frequency::Daily => true,
        Frequency::Weekly => habit.task_days.contains(&weekday_number(date.weekday())),
        Frequency::Custom => match &habit.custom_schedule {
            Some(schedule) => matches_custom(schedule, date),
            None => false,
        },
    }
}

fn matches_custom(schedule: &CustomSchedule, date: NaiveDate) -> bool {
    match schedule {
        CustomSchedule::DaysOfMonth { days } => days.contains(&(date.day() as u8)),
        CustomSchedule::IntervalDays { interval: 0 } => false,
        CustomSchedule::IntervalDays { interval } => {
            days_since_epoch(date).rem_euclid(i64::from(*interval)) == 0
        }
    }
}

/// First task day in `date ..= date + max_lookahead_days`.
///
/// Returns `None` when no task day falls inside the window, which is
/// also how a habit without any reachable task day reports itself.
pub fn next_task_day_on_or_after(
    habit: &Habit,
    date: NaiveDate,
    max_lookahead_days: u32,
) -> Option<NaiveDate> {
    let mut candidate = date;
    for step in 0..=max_lookahead_days {
        if is_task_day(habit, candidate) {
            return Some(candidate);
        }
        if step < max_lookahead_days {
            candidate = candidate.succ_opt()?;
        }
    }
    None
}

impl Habit {
    /// See [`is_task_day`].
    pub fn is_task_day(&self, date: NaiveDate) -> bool {
        is_task_day(self, date)
    }

    /// See [`next_task_day_on_or_after`].
    pub fn next_task_day_on_or_after(
        &self,
        date: NaiveDate,
        max_lookahead_days: u32,
    ) -> Option<NaiveDate> {
        next_task_day_on_or_after(self, date, max_lookahead_days)
    }
}
