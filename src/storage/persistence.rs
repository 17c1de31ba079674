use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::collections::Collections;

use super::{KeyValueStorage, StorageError};

/// Default name of the slot holding the whole snapshot.
pub const DEFAULT_SLOT: &str = "lodestar-data";

/// The snapshot with each record still as plain JSON, so a record that no
/// longer deserializes can be dropped on its own.
#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(rename = "taskList", default)]
    tasks: Vec<Value>,
    #[serde(rename = "goalList", default)]
    goals: Vec<Value>,
    #[serde(rename = "habitList", default)]
    habits: Vec<Value>,
}

/// Reads and writes the full snapshot to a single storage slot.
#[derive(Debug)]
pub struct Persistence<S> {
    storage: S,
    slot: String,
}

impl<S: KeyValueStorage> Persistence<S> {
    pub fn new(storage: S, slot: impl Into<String>) -> Self {
        Self {
            storage,
            slot: slot.into(),
        }
    }

    /// Slot that receives a copy of data that could not be fully loaded.
    pub fn backup_slot(&self) -> String {
        format!("{}.corrupt", self.slot)
    }

    /// Load the snapshot. Missing or unreadable data yields empty collections;
    /// records that fail to deserialize are skipped. Whenever anything was
    /// skipped the stored text is first copied to `backup_slot`, before a
    /// later save can replace it.
    pub fn load(&mut self) -> Collections {
        let content = match self.storage.get(&self.slot) {
            Ok(Some(content)) => content,
            Ok(None) => {
                log::debug!("No saved data in slot {}, starting empty", self.slot);
                return Collections::default();
            }
            Err(e) => {
                log::warn!("Failed to read slot {}: {}", self.slot, e);
                return Collections::default();
            }
        };

        let (collections, skipped) = match serde_json::from_str::<RawSnapshot>(&content) {
            Ok(raw) => {
                let mut skipped = 0;
                let collections = Collections {
                    tasks: records(&self.slot, "task", raw.tasks, &mut skipped),
                    goals: records(&self.slot, "goal", raw.goals, &mut skipped),
                    habits: records(&self.slot, "habit", raw.habits, &mut skipped),
                };
                (collections, skipped)
            }
            Err(e) => {
                log::warn!("Ignoring unparseable data in slot {}: {}", self.slot, e);
                (Collections::default(), 1)
            }
        };

        if skipped > 0 {
            self.set_aside(&content);
        }
        log::debug!(
            "Loaded {} tasks, {} goals, {} habits",
            collections.tasks.len(),
            collections.goals.len(),
            collections.habits.len()
        );
        collections
    }

    /// Replace the stored snapshot with `collections`.
    pub fn save(&mut self, collections: &Collections) -> Result<(), StorageError> {
        let json = serde_json::to_string(collections)?;
        self.storage.set(&self.slot, &json)
    }

    fn set_aside(&mut self, content: &str) {
        let backup = self.backup_slot();
        match self.storage.set(&backup, content) {
            Ok(()) => log::warn!("Copied unreadable data from {} to {}", self.slot, backup),
            Err(e) => log::error!("Failed to copy unreadable data to {}: {}", backup, e),
        }
    }
}

fn records<T: DeserializeOwned>(slot: &str, kind: &str, raw: Vec<Value>, skipped: &mut usize) -> Vec<T> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping {} #{} in slot {}: {}", kind, index, slot, e);
                *skipped += 1;
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::goal::Goal;
    use crate::core::habit::Habit;
    use crate::core::task::{Priority, Task};
    use crate::storage::{FileStorage, MemoryStorage};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample() -> Collections {
        let now = Utc.with_ymd_and_hms(2026, 2, 23, 14, 0, 0).unwrap();
        let mut task = Task::new("Write spec", now);
        task.priority = Priority::High;
        task.due_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        task.description = "outline first".to_string();
        let mut done = Task::new("Buy milk", now);
        done.completed = true;

        let mut goal = Goal::new("Learn Rust", now);
        goal.deadline = NaiveDate::from_ymd_opt(2026, 12, 31);

        Collections {
            tasks: vec![task, done],
            goals: vec![goal],
            habits: vec![Habit::new("Read daily", 30, now)],
        }
    }

    #[test]
    fn empty_storage_loads_empty_collections() {
        let mut persistence = Persistence::new(MemoryStorage::new(), DEFAULT_SLOT);
        assert_eq!(persistence.load(), Collections::default());
    }

    #[test]
    fn garbage_loads_empty_collections() {
        let storage = MemoryStorage::new();
        storage.put_raw(DEFAULT_SLOT, "{not json");
        let mut persistence = Persistence::new(storage.clone(), DEFAULT_SLOT);
        assert!(persistence.load().is_empty());
        assert_eq!(storage.raw("lodestar-data.corrupt").as_deref(), Some("{not json"));
    }

    #[test]
    fn save_then_load_preserves_everything() {
        let mut persistence = Persistence::new(MemoryStorage::new(), DEFAULT_SLOT);
        let collections = sample();
        persistence.save(&collections).unwrap();
        assert_eq!(persistence.load(), collections);
    }

    #[test]
    fn save_replaces_whole_snapshot() {
        let storage = MemoryStorage::new();
        let mut persistence = Persistence::new(storage.clone(), DEFAULT_SLOT);
        persistence.save(&sample()).unwrap();
        persistence.save(&Collections::default()).unwrap();

        let raw = storage.raw(DEFAULT_SLOT).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["taskList"], serde_json::json!([]));
        assert_eq!(value["goalList"], serde_json::json!([]));
        assert_eq!(value["habitList"], serde_json::json!([]));
    }

    #[test]
    fn failed_save_keeps_previous_snapshot() {
        let storage = MemoryStorage::new();
        let mut persistence = Persistence::new(storage.clone(), DEFAULT_SLOT);
        persistence.save(&Collections::default()).unwrap();
        let before = storage.raw(DEFAULT_SLOT);

        let mut limited = Persistence::new(storage.clone().with_quota(10), DEFAULT_SLOT);
        assert!(limited.save(&sample()).is_err());
        assert_eq!(storage.raw(DEFAULT_SLOT), before);
    }

    #[test]
    fn file_backed_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let collections = sample();
        {
            let mut persistence = Persistence::new(FileStorage::new(dir.path()), "snapshot");
            persistence.save(&collections).unwrap();
        }
        let mut reopened = Persistence::new(FileStorage::new(dir.path()), "snapshot");
        assert_eq!(reopened.load(), collections);
    }

    #[test]
    fn bad_records_are_skipped_and_the_rest_kept() {
        let storage = MemoryStorage::new();
        let seeded = r#"{
            "taskList": [
                {"id": "550e8400-e29b-41d4-a716-446655440000", "title": "Keep me",
                 "priority": "high", "createdAt": "2026-02-23T14:00:00Z"},
                {"id": "550e8400-e29b-41d4-a716-446655440001", "title": "Odd priority",
                 "priority": "urgent", "createdAt": "2026-02-23T14:00:00Z"},
                {"id": "550e8400-e29b-41d4-a716-446655440002", "title": "Null notes",
                 "description": null, "createdAt": "2026-02-23T14:00:00Z"}
            ],
            "goalList": [
                {"id": "550e8400-e29b-41d4-a716-446655440003", "title": "Learn Rust",
                 "createdAt": "2026-02-23T14:00:00Z"}
            ]
        }"#;
        storage.put_raw(DEFAULT_SLOT, seeded);

        let mut persistence = Persistence::new(storage.clone(), DEFAULT_SLOT);
        let loaded = persistence.load();
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].title, "Keep me");
        assert_eq!(loaded.goals.len(), 1);
        assert!(loaded.habits.is_empty());
        assert_eq!(storage.raw(&persistence.backup_slot()).as_deref(), Some(seeded));
    }

    #[test]
    fn clean_snapshot_is_not_copied_aside() {
        let storage = MemoryStorage::new();
        let mut persistence = Persistence::new(storage.clone(), DEFAULT_SLOT);
        persistence.save(&sample()).unwrap();
        persistence.load();
        assert_eq!(storage.raw("lodestar-data.corrupt"), None);
        assert_eq!(storage.writes(), 1);
    }
}
