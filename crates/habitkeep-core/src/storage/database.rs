//! SQLite-backed habit store.
//!
//! One row per habit in `habits`, one row per completed calendar day in
//! `habit_completions`. Saving rewrites a habit's completion rows inside a
//! transaction so the stored date set always matches the in-memory one.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::migrations;
use super::{data_dir, HabitStore};
use crate::error::StorageError;
use crate::habit::{CustomSchedule, Frequency, Habit, HabitType};

// === Helper Functions ===

fn format_frequency(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Daily => "daily",
        Frequency::Weekly => "weekly",
        Frequency::Custom => "custom",
    }
}

fn parse_frequency(s: &str) -> Option<Frequency> {
    match s {
        "daily" => Some(Frequency::Daily),
        "weekly" => Some(Frequency::Weekly),
        "custom" => Some(Frequency::Custom),
        _ => None,
    }
}

fn format_habit_type(habit_type: HabitType) -> &'static str {
    match habit_type {
        HabitType::Positive => "positive",
        HabitType::Negative => "negative",
    }
}

/// Unknown values fall back to positive.
fn parse_habit_type(s: &str) -> HabitType {
    match s {
        "negative" => HabitType::Negative,
        _ => HabitType::Positive,
    }
}

fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Raw column values of a `habits` row, before validation.
struct HabitRow {
    id: String,
    name: String,
    icon_name: String,
    habit_type: String,
    target_duration_secs: Option<u64>,
    frequency: String,
    task_days: String,
    custom_schedule: Option<String>,
    is_completed: bool,
    last_completed_date: Option<String>,
    last_reset_date: Option<String>,
    current_streak: u32,
    best_streak: u32,
    created_at: String,
}

const HABIT_COLUMNS: &str = "id, name, icon_name, habit_type, target_duration_secs, frequency,
     task_days, custom_schedule, is_completed, last_completed_date, last_reset_date,
     current_streak, best_streak, created_at";

impl HabitRow {
    fn from_row(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            icon_name: row.get(2)?,
            habit_type: row.get(3)?,
            target_duration_secs: row.get(4)?,
            frequency: row.get(5)?,
            task_days: row.get(6)?,
            custom_schedule: row.get(7)?,
            is_completed: row.get(8)?,
            last_completed_date: row.get(9)?,
            last_reset_date: row.get(10)?,
            current_streak: row.get(11)?,
            best_streak: row.get(12)?,
            created_at: row.get(13)?,
        })
    }

    fn into_habit(self, completion_dates: BTreeSet<NaiveDate>) -> Result<Habit, StorageError> {
        let corrupt = |message: String| StorageError::CorruptRecord {
            id: self.id.clone(),
            message,
        };
        let parse_day = |raw: Option<&String>| -> Result<Option<NaiveDate>, StorageError> {
            raw.map(|s| s.parse::<NaiveDate>().map_err(|e| corrupt(format!("bad date '{s}': {e}"))))
                .transpose()
        };

        let frequency = parse_frequency(&self.frequency)
            .ok_or_else(|| corrupt(format!("unknown frequency '{}'", self.frequency)))?;
        let task_days: BTreeSet<u8> = serde_json::from_str(&self.task_days)
            .map_err(|e| corrupt(format!("bad task_days: {e}")))?;
        let custom_schedule = self
            .custom_schedule
            .as_deref()
            .map(|raw| serde_json::from_str::<CustomSchedule>(raw))
            .transpose()
            .map_err(|e| corrupt(format!("bad custom_schedule: {e}")))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| corrupt(format!("bad created_at: {e}")))?;
        let last_completed_date = parse_day(self.last_completed_date.as_ref())?;
        let last_reset_date = parse_day(self.last_reset_date.as_ref())?;

        Ok(Habit {
            habit_type: parse_habit_type(&self.habit_type),
            frequency,
            task_days,
            custom_schedule,
            completion_dates,
            is_completed: self.is_completed,
            last_completed_date,
            last_reset_date,
            current_streak: self.current_streak,
            best_streak: self.best_streak,
            target_duration_secs: self.target_duration_secs,
            created_at,
            id: self.id,
            name: self.name,
            icon_name: self.icon_name,
        })
    }
}

/// SQLite database for habit storage.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `<data_dir>/habitkeep.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(&data_dir()?.join("habitkeep.db"))
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        migrations::migrate(&conn).map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn completions_for(&self, id: &str) -> Result<BTreeSet<NaiveDate>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT day FROM habit_completions WHERE habit_id = ?1")?;
        let days = stmt
            .query_map(params![id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        parse_days(id, days)
    }
}

fn parse_days(id: &str, days: Vec<String>) -> Result<BTreeSet<NaiveDate>, StorageError> {
    days.into_iter()
        .map(|s| {
            s.parse::<NaiveDate>().map_err(|e| StorageError::CorruptRecord {
                id: id.to_string(),
                message: format!("bad completion day '{s}': {e}"),
            })
        })
        .collect()
}

impl HabitStore for SqliteStore {
    fn load_all_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut by_habit: HashMap<String, Vec<String>> = HashMap::new();
        let mut stmt = self
            .conn
            .prepare("SELECT habit_id, day FROM habit_completions")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (habit_id, day) = row?;
            by_habit.entry(habit_id).or_default().push(day);
        }

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits ORDER BY created_at, id"
        ))?;
        let rows = stmt
            .query_map([], HabitRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| {
                let days = by_habit.remove(&row.id).unwrap_or_default();
                let completions = parse_days(&row.id, days)?;
                row.into_habit(completions)
            })
            .collect()
    }

    fn get(&self, id: &str) -> Result<Option<Habit>, StorageError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1"),
                params![id],
                HabitRow::from_row,
            )
            .optional()?;
        match row {
            Some(row) => {
                let completions = self.completions_for(id)?;
                Ok(Some(row.into_habit(completions)?))
            }
            None => Ok(None),
        }
    }

    fn save(&mut self, habit: &Habit) -> Result<(), StorageError> {
        let task_days = serde_json::to_string(&habit.task_days)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        let custom_schedule = habit
            .custom_schedule
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO habits (
                id, name, icon_name, habit_type, target_duration_secs, frequency,
                task_days, custom_schedule, is_completed, last_completed_date, last_reset_date,
                current_streak, best_streak, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                icon_name = excluded.icon_name,
                habit_type = excluded.habit_type,
                target_duration_secs = excluded.target_duration_secs,
                frequency = excluded.frequency,
                task_days = excluded.task_days,
                custom_schedule = excluded.custom_schedule,
                is_completed = excluded.is_completed,
                last_completed_date = excluded.last_completed_date,
                last_reset_date = excluded.last_reset_date,
                current_streak = excluded.current_streak,
                best_streak = excluded.best_streak,
                created_at = excluded.created_at",
            params![
                habit.id,
                habit.name,
                habit.icon_name,
                format_habit_type(habit.habit_type),
                habit.target_duration_secs,
                format_frequency(habit.frequency),
                task_days,
                custom_schedule,
                habit.is_completed,
                habit.last_completed_date.map(format_day),
                habit.last_reset_date.map(format_day),
                habit.current_streak,
                habit.best_streak,
                habit.created_at.to_rfc3339(),
            ],
        )?;
        tx.execute(
            "DELETE FROM habit_completions WHERE habit_id = ?1",
            params![habit.id],
        )?;
        {
            let mut insert =
                tx.prepare("INSERT INTO habit_completions (habit_id, day) VALUES (?1, ?2)")?;
            for day in &habit.completion_dates {
                insert.execute(params![habit.id, format_day(*day)])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM habit_completions WHERE habit_id = ?1", params![id])?;
        let removed = tx.execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Habit {
        let mut habit = Habit::weekly("Gym", [Weekday::Mon, Weekday::Thu])
            .with_icon("dumbbell")
            .with_type(HabitType::Negative)
            .with_target_duration(1800)
            .with_completions([day(2024, 3, 4), day(2024, 3, 7)]);
        habit.last_reset_date = Some(day(2024, 3, 7));
        habit.is_completed = true;
        habit.current_streak = 2;
        habit.best_streak = 5;
        habit
    }

    #[test]
    fn save_and_get_roundtrip() {
        let mut store = SqliteStore::open_memory().unwrap();
        let habit = sample();
        store.save(&habit).unwrap();

        let loaded = store.get(&habit.id).unwrap().unwrap();
        assert_eq!(loaded.id, habit.id);
        assert_eq!(loaded.task_days, habit.task_days);
        assert_eq!(loaded.completion_dates, habit.completion_dates);
        assert_eq!(loaded.best_streak, 5);
        assert_eq!(loaded.habit_type, HabitType::Negative);
        assert_eq!(loaded.target_duration_secs, Some(1800));
        assert_eq!(loaded.last_reset_date, Some(day(2024, 3, 7)));
    }

    #[test]
    fn custom_schedule_roundtrip() {
        let mut store = SqliteStore::open_memory().unwrap();
        let habit = Habit::custom("Plants", CustomSchedule::interval_days(3).unwrap());
        store.save(&habit).unwrap();
        let loaded = store.get(&habit.id).unwrap().unwrap();
        assert_eq!(loaded.custom_schedule, habit.custom_schedule);
        assert_eq!(loaded.frequency, Frequency::Custom);
    }

    #[test]
    fn save_replaces_completion_rows() {
        let mut store = SqliteStore::open_memory().unwrap();
        let mut habit = sample();
        store.save(&habit).unwrap();

        habit.completion_dates.remove(&day(2024, 3, 4));
        habit.completion_dates.insert(day(2024, 3, 11));
        store.save(&habit).unwrap();

        let loaded = store.get(&habit.id).unwrap().unwrap();
        assert_eq!(
            loaded.completion_dates,
            BTreeSet::from([day(2024, 3, 7), day(2024, 3, 11)])
        );
        assert_eq!(store.load_all_habits().unwrap().len(), 1);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn delete_removes_habit_and_history() {
        let mut store = SqliteStore::open_memory().unwrap();
        let habit = sample();
        store.save(&habit).unwrap();

        assert!(store.delete(&habit.id).unwrap());
        assert!(!store.delete(&habit.id).unwrap());
        let rows: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM habit_completions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn corrupt_frequency_is_reported() {
        let mut store = SqliteStore::open_memory().unwrap();
        let habit = Habit::daily("Read");
        store.save(&habit).unwrap();
        store
            .conn()
            .execute("UPDATE habits SET frequency = 'hourly'", [])
            .unwrap();

        let err = store.get(&habit.id).unwrap_err();
        assert!(matches!(err, StorageError::CorruptRecord { .. }));
    }
}
