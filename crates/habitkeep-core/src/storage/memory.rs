//! In-memory habit store.

use std::collections::HashMap;

use super::HabitStore;
use crate::error::StorageError;
use crate::habit::Habit;

/// `HashMap`-backed store for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    habits: HashMap<String, Habit>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }
}

impl HabitStore for MemoryStore {
    fn load_all_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut habits: Vec<Habit> = self.habits.values().cloned().collect();
        habits.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(habits)
    }

    fn get(&self, id: &str) -> Result<Option<Habit>, StorageError> {
        Ok(self.habits.get(id).cloned())
    }

    fn save(&mut self, habit: &Habit) -> Result<(), StorageError> {
        self.habits.insert(habit.id.clone(), habit.clone());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        Ok(self.habits.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_overwrites_by_id() {
        let mut store = MemoryStore::new();
        let mut habit = Habit::daily("Read");
        store.save(&habit).unwrap();
        habit.name = "Read more".into();
        store.save(&habit).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&habit.id).unwrap().unwrap().name, "Read more");
    }

    #[test]
    fn delete_reports_presence() {
        let mut store = MemoryStore::new();
        let habit = Habit::daily("Read");
        store.save(&habit).unwrap();
        assert!(store.delete(&habit.id).unwrap());
        assert!(!store.delete(&habit.id).unwrap());
        assert!(store.is_empty());
    }
}
