//! Habit entity and schedule configuration types.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Whether the habit is one to build or one to break.
///
/// Only affects how a display layer words things; scheduling and streak
/// math treat both the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitType {
    #[default]
    Positive,
    Negative,
}

/// Which schedule rule applies to a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every calendar day is a task day.
    #[default]
    Daily,
    /// Task days are the weekdays listed in `Habit::task_days`.
    Weekly,
    /// Task days come from `Habit::custom_schedule`.
    Custom,
}

/// Discriminant of a [`CustomSchedule`], used for storage and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    DaysOfMonth,
    IntervalDays,
}

/// Monthly or fixed-interval schedule for `Frequency::Custom` habits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "schedule_type", rename_all = "snake_case")]
pub enum CustomSchedule {
    /// Task day when the day-of-month (1..=31) is in `days`.
    DaysOfMonth { days: BTreeSet<u8> },
    /// Task day every `interval` days, counted from 1970-01-01.
    IntervalDays { interval: u32 },
}

impl CustomSchedule {
    /// Build a days-of-month schedule, rejecting an empty set or days
    /// outside 1..=31.
    pub fn days_of_month(days: impl IntoIterator<Item = u8>) -> Result<Self, ValidationError> {
        let schedule = CustomSchedule::DaysOfMonth {
            days: days.into_iter().collect(),
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Build an interval schedule, rejecting a zero interval.
    pub fn interval_days(interval: u32) -> Result<Self, ValidationError> {
        let schedule = CustomSchedule::IntervalDays { interval };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn schedule_type(&self) -> ScheduleType {
        match self {
            CustomSchedule::DaysOfMonth { .. } => ScheduleType::DaysOfMonth,
            CustomSchedule::IntervalDays { .. } => ScheduleType::IntervalDays,
        }
    }

    /// Check internal consistency for the schedule's type.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            CustomSchedule::DaysOfMonth { days } => {
                if days.is_empty() {
                    return Err(ValidationError::NoDaysOfMonth);
                }
                if let Some(&bad) = days.iter().find(|d| !(1..=31).contains(*d)) {
                    return Err(ValidationError::InvalidDayOfMonth(bad));
                }
                Ok(())
            }
            CustomSchedule::IntervalDays { interval } => {
                if *interval == 0 {
                    Err(ValidationError::ZeroInterval)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Weekday number in the Sunday=1 .. Saturday=7 convention used by
/// `Habit::task_days`.
pub fn weekday_number(weekday: Weekday) -> u8 {
    weekday.number_from_sunday() as u8
}

/// A tracked habit and all of its mutable streak state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon_name: String,
    #[serde(default)]
    pub habit_type: HabitType,
    /// Display-only target duration.
    #[serde(default)]
    pub target_duration_secs: Option<u64>,
    pub frequency: Frequency,
    /// Weekday numbers (Sunday=1 .. Saturday=7), used when weekly.
    #[serde(default)]
    pub task_days: BTreeSet<u8>,
    #[serde(default)]
    pub custom_schedule: Option<CustomSchedule>,
    #[serde(default)]
    pub completion_dates: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub last_completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_reset_date: Option<NaiveDate>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a habit with a fresh id and empty history.
    pub fn new(name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            icon_name: String::new(),
            habit_type: HabitType::Positive,
            target_duration_secs: None,
            frequency,
            task_days: BTreeSet::new(),
            custom_schedule: None,
            completion_dates: BTreeSet::new(),
            is_completed: false,
            last_completed_date: None,
            last_reset_date: None,
            current_streak: 0,
            best_streak: 0,
            created_at: Utc::now(),
        }
    }

    /// Daily habit.
    pub fn daily(name: impl Into<String>) -> Self {
        Self::new(name, Frequency::Daily)
    }

    /// Weekly habit on the given weekdays.
    pub fn weekly(name: impl Into<String>, days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut habit = Self::new(name, Frequency::Weekly);
        habit.task_days = days.into_iter().map(weekday_number).collect();
        habit
    }

    /// Custom-frequency habit.
    pub fn custom(name: impl Into<String>, schedule: CustomSchedule) -> Self {
        let mut habit = Self::new(name, Frequency::Custom);
        habit.custom_schedule = Some(schedule);
        habit
    }

    pub fn with_icon(mut self, icon_name: impl Into<String>) -> Self {
        self.icon_name = icon_name.into();
        self
    }

    pub fn with_type(mut self, habit_type: HabitType) -> Self {
        self.habit_type = habit_type;
        self
    }

    pub fn with_target_duration(mut self, secs: u64) -> Self {
        self.target_duration_secs = Some(secs);
        self
    }

    /// Seed completion history, keeping `last_completed_date` in sync.
    pub fn with_completions(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.completion_dates.extend(dates);
        self.last_completed_date = self.completion_dates.last().copied();
        self
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completion_dates.contains(&date)
    }

    /// Check the invariants the editing surface is expected to enforce.
    ///
    /// # Errors
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if let Some(&bad) = self.task_days.iter().find(|d| !(1..=7).contains(*d)) {
            return Err(ValidationError::InvalidWeekday(bad));
        }
        match self.frequency {
            Frequency::Daily => Ok(()),
            Frequency::Weekly if self.task_days.is_empty() => Err(ValidationError::NoTaskDays),
            Frequency::Weekly => Ok(()),
            Frequency::Custom => self
                .custom_schedule
                .as_ref()
                .ok_or(ValidationError::MissingCustomSchedule)?
                .validate(),
        }
    }
}
