use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::goal::Goal;
use super::habit::Habit;
use super::task::Task;

/// One of the three record kinds, and the tab that shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Tasks,
    Goals,
    Habits,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Tasks, Section::Goals, Section::Habits];
}

/// All tracked records. Serialized as a whole into the data slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(rename = "taskList", default)]
    pub tasks: Vec<Task>,
    #[serde(rename = "goalList", default)]
    pub goals: Vec<Goal>,
    #[serde(rename = "habitList", default)]
    pub habits: Vec<Habit>,
}

impl Collections {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.goals.is_empty() && self.habits.is_empty()
    }

    pub fn len(&self, section: Section) -> usize {
        match section {
            Section::Tasks => self.tasks.len(),
            Section::Goals => self.goals.len(),
            Section::Habits => self.habits.len(),
        }
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn goal(&self, id: Uuid) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn habit(&self, id: Uuid) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn ids(&self, section: Section) -> Vec<Uuid> {
        match section {
            Section::Tasks => self.tasks.iter().map(|t| t.id).collect(),
            Section::Goals => self.goals.iter().map(|g| g.id).collect(),
            Section::Habits => self.habits.iter().map(|h| h.id).collect(),
        }
    }

    /// Drop the record with `id` from `section`. Returns whether anything was removed.
    pub fn remove(&mut self, section: Section, id: Uuid) -> bool {
        let before = self.len(section);
        match section {
            Section::Tasks => self.tasks.retain(|t| t.id != id),
            Section::Goals => self.goals.retain(|g| g.id != id),
            Section::Habits => self.habits.retain(|h| h.id != id),
        }
        self.len(section) != before
    }
}
