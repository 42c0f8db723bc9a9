//! SQLite store behaviour across reopen, plus the store-backed operations.

use chrono::{NaiveDate, Weekday};
use habitkeep_core::{
    add_habit, rollover_all, toggle_and_save, CoreError, CustomSchedule, Habit, HabitStore,
    HabitType, SqliteStore,
};
use tempfile::TempDir;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn habits_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("habitkeep.db");

    let weekly = Habit::weekly("Gym", [Weekday::Mon, Weekday::Thu])
        .with_icon("dumbbell")
        .with_target_duration(1800)
        .with_completions([day(2024, 6, 10), day(2024, 6, 13)]);
    let custom = Habit::custom("Rent", CustomSchedule::days_of_month([1]).unwrap())
        .with_type(HabitType::Negative);

    {
        let mut store = SqliteStore::open_at(&path).unwrap();
        add_habit(&mut store, weekly.clone(), day(2024, 6, 13)).unwrap();
        add_habit(&mut store, custom.clone(), day(2024, 6, 13)).unwrap();
    }

    let store = SqliteStore::open_at(&path).unwrap();
    let loaded = store.get(&weekly.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Gym");
    assert_eq!(loaded.icon_name, "dumbbell");
    assert_eq!(loaded.target_duration_secs, Some(1800));
    assert_eq!(loaded.completion_dates, weekly.completion_dates);
    assert_eq!(loaded.current_streak, 2);
    assert!(loaded.is_completed);
    assert_eq!(loaded.last_reset_date, Some(day(2024, 6, 13)));
    assert_eq!(loaded.created_at, weekly.created_at);

    let rent = store.get(&custom.id).unwrap().unwrap();
    assert_eq!(rent.habit_type, HabitType::Negative);
    assert_eq!(rent.custom_schedule, custom.custom_schedule);

    assert_eq!(store.load_all_habits().unwrap().len(), 2);
}

#[test]
fn toggle_and_rollover_persist() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("habitkeep.db");
    let mut store = SqliteStore::open_at(&path).unwrap();

    let habit = add_habit(&mut store, Habit::daily("Read"), day(2024, 6, 10)).unwrap();
    let done = toggle_and_save(&mut store, &habit.id, day(2024, 6, 10)).unwrap();
    assert!(done.is_completed);

    let report = rollover_all(&mut store, day(2024, 6, 11)).unwrap();
    assert_eq!(report.checked, 1);
    assert_eq!(report.updated, 1);
    assert!(report.failed.is_empty());

    drop(store);
    let store = SqliteStore::open_at(&path).unwrap();
    let reloaded = store.get(&habit.id).unwrap().unwrap();
    assert!(!reloaded.is_completed);
    assert_eq!(reloaded.current_streak, 1);
    assert_eq!(reloaded.best_streak, 1);
    assert_eq!(reloaded.last_reset_date, Some(day(2024, 6, 11)));
}

#[test]
fn second_rollover_same_day_saves_nothing() {
    let mut store = SqliteStore::open_memory().unwrap();
    add_habit(&mut store, Habit::daily("Read"), day(2024, 6, 10)).unwrap();

    assert_eq!(rollover_all(&mut store, day(2024, 6, 12)).unwrap().updated, 1);
    assert_eq!(rollover_all(&mut store, day(2024, 6, 12)).unwrap().updated, 0);
}

#[test]
fn toggle_unknown_habit_is_not_found() {
    let mut store = SqliteStore::open_memory().unwrap();
    assert!(matches!(
        toggle_and_save(&mut store, "missing", day(2024, 6, 10)),
        Err(CoreError::HabitNotFound(id)) if id == "missing"
    ));
}

#[test]
fn delete_removes_habit_and_history() {
    let mut store = SqliteStore::open_memory().unwrap();
    let habit = add_habit(
        &mut store,
        Habit::daily("Read").with_completions([day(2024, 6, 9)]),
        day(2024, 6, 10),
    )
    .unwrap();

    assert!(store.delete(&habit.id).unwrap());
    assert!(!store.delete(&habit.id).unwrap());
    assert!(store.get(&habit.id).unwrap().is_none());

    let orphans: i64 = store
        .conn()
        .query_row("SELECT COUNT(*) FROM habit_completions", [], |row| row.get(0))
        .unwrap();
    assert_eq!(orphans, 0);
}
