//! Habit model, task-day evaluation and streak calculation.

mod model;
pub mod schedule;
pub mod streak;

pub use model::{weekday_number, CustomSchedule, Frequency, Habit, HabitType, ScheduleType};
pub use schedule::{days_since_epoch, is_task_day, next_task_day_on_or_after};
pub use streak::{
    check_and_reset_for_new_day, current_streak, longest_streak_between, recompute,
    toggle_completion,
};
