//! The single owner of all tracked records.
//!
//! Every mutation runs the same sequence: change the in-memory
//! collections, write the full snapshot, then hand the new state to the
//! view. A failed write restores the previous collections and skips the
//! view, so nothing is ever shown that is not on disk.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::core::clock::Clock;
use crate::core::collections::{Collections, Section};
use crate::core::goal::Goal;
use crate::core::habit::{Habit, target_days_or_default};
use crate::core::task::{Priority, Task, TaskFilter};
use crate::fl;
use crate::storage::{KeyValueStorage, Persistence, StorageError};

/// Text fields that must not be blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    TaskTitle,
    GoalTitle,
    HabitName,
}

impl RequiredField {
    /// Message asking the user to fill the field in.
    pub fn prompt(&self) -> String {
        match self {
            Self::TaskTitle => fl!("validation-task-title"),
            Self::GoalTitle => fl!("validation-goal-title"),
            Self::HabitName => fl!("validation-habit-name"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}", .0.prompt())]
    Validation(RequiredField),

    #[error("changes were not saved: {0}")]
    Persistence(#[from] StorageError),
}

/// Result of an operation that addresses an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    NotFound,
    /// The typed id prefix fits more than one record.
    Ambiguous,
    Declined,
}

/// How typed id text resolved against one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMatch {
    Found(Uuid),
    Ambiguous,
    Missing,
}

/// Yes/no gate asked before anything is removed.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Receives the current collections after every saved change.
pub trait ViewSink {
    fn refresh(&mut self, section: Section, collections: &Collections, now: DateTime<Utc>);

    /// Change which tasks the task view lists. Views without a filter ignore it.
    fn set_task_filter(&mut self, _filter: TaskFilter) {}
}

/// Headless use: nothing to redraw.
impl ViewSink for () {
    fn refresh(&mut self, _section: Section, _collections: &Collections, _now: DateTime<Utc>) {}
}

pub struct CollectionStore<S, C, V> {
    collections: Collections,
    persistence: Persistence<S>,
    clock: C,
    view: V,
}

impl<S, C, V> CollectionStore<S, C, V>
where
    S: KeyValueStorage,
    C: Clock,
    V: ViewSink,
{
    /// Bootstrap from whatever the slot holds; never fails.
    pub fn open(mut persistence: Persistence<S>, clock: C, view: V) -> Self {
        let collections = persistence.load();
        Self {
            collections,
            persistence,
            clock,
            view,
        }
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Redraw a section without changing anything.
    pub fn refresh(&mut self, section: Section) {
        self.view.refresh(section, &self.collections, self.clock.now());
    }

    pub fn add_task(
        &mut self,
        title: &str,
        description: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Result<Uuid, StoreError> {
        let title = required(title, RequiredField::TaskTitle)?;
        let mut task = Task::new(title, self.clock.now());
        task.description = description.trim().to_string();
        task.priority = priority;
        task.due_date = due_date;
        let id = task.id;

        self.commit(Section::Tasks, |c| {
            c.tasks.push(task);
            true
        })?;
        log::info!("Added task {}", id);
        Ok(id)
    }

    pub fn toggle_task(&mut self, id: Uuid) -> Result<Outcome, StoreError> {
        let outcome = self.commit(Section::Tasks, |c| match c.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.toggle();
                true
            }
            None => false,
        })?;
        log_outcome("toggle task", id, outcome);
        Ok(outcome)
    }

    pub fn delete_task(&mut self, id: Uuid, confirm: &mut dyn Confirm) -> Result<Outcome, StoreError> {
        self.remove_confirmed(Section::Tasks, id, &fl!("confirm-delete-task"), confirm)
    }

    pub fn add_goal(
        &mut self,
        title: &str,
        deadline: Option<NaiveDate>,
        description: &str,
    ) -> Result<Uuid, StoreError> {
        let title = required(title, RequiredField::GoalTitle)?;
        let mut goal = Goal::new(title, self.clock.now());
        goal.deadline = deadline;
        goal.description = description.trim().to_string();
        let id = goal.id;

        self.commit(Section::Goals, |c| {
            c.goals.push(goal);
            true
        })?;
        log::info!("Added goal {}", id);
        Ok(id)
    }

    pub fn remove_goal(&mut self, id: Uuid, confirm: &mut dyn Confirm) -> Result<Outcome, StoreError> {
        self.remove_confirmed(Section::Goals, id, &fl!("confirm-delete-goal"), confirm)
    }

    /// `target_days` falls back to the default unless it is a positive integer.
    pub fn add_habit(&mut self, name: &str, target_days: Option<i64>) -> Result<Uuid, StoreError> {
        let name = required(name, RequiredField::HabitName)?;
        let habit = Habit::new(name, target_days_or_default(target_days), self.clock.now());
        let id = habit.id;

        self.commit(Section::Habits, |c| {
            c.habits.push(habit);
            true
        })?;
        log::info!("Added habit {}", id);
        Ok(id)
    }

    pub fn remove_habit(&mut self, id: Uuid, confirm: &mut dyn Confirm) -> Result<Outcome, StoreError> {
        self.remove_confirmed(Section::Habits, id, &fl!("confirm-delete-habit"), confirm)
    }

    /// Resolve a full id or a unique prefix of one.
    pub fn match_id(&self, section: Section, text: &str) -> IdMatch {
        let text = text.trim().to_ascii_lowercase();
        if text.is_empty() {
            return IdMatch::Missing;
        }
        let ids = self.collections.ids(section);
        if let Ok(id) = Uuid::parse_str(&text) {
            if ids.contains(&id) {
                return IdMatch::Found(id);
            }
            return IdMatch::Missing;
        }
        let mut matches = ids
            .into_iter()
            .filter(|id| id.to_string().starts_with(&text));
        match (matches.next(), matches.next()) {
            (Some(id), None) => IdMatch::Found(id),
            (Some(_), Some(_)) => IdMatch::Ambiguous,
            _ => IdMatch::Missing,
        }
    }

    pub fn find_id(&self, section: Section, text: &str) -> Option<Uuid> {
        match self.match_id(section, text) {
            IdMatch::Found(id) => Some(id),
            IdMatch::Ambiguous | IdMatch::Missing => None,
        }
    }

    fn remove_confirmed(
        &mut self,
        section: Section,
        id: Uuid,
        message: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<Outcome, StoreError> {
        if !self.collections.ids(section).contains(&id) {
            log_outcome("remove", id, Outcome::NotFound);
            return Ok(Outcome::NotFound);
        }
        if !confirm.confirm(message) {
            log_outcome("remove", id, Outcome::Declined);
            return Ok(Outcome::Declined);
        }
        let outcome = self.commit(section, |c| c.remove(section, id))?;
        log_outcome("remove", id, outcome);
        Ok(outcome)
    }

    /// Apply `mutate`, persist, then notify the view. `mutate` returns
    /// false when there was nothing to change.
    fn commit<F>(&mut self, section: Section, mutate: F) -> Result<Outcome, StoreError>
    where
        F: FnOnce(&mut Collections) -> bool,
    {
        let previous = self.collections.clone();
        if !mutate(&mut self.collections) {
            return Ok(Outcome::NotFound);
        }

        if let Err(e) = self.persistence.save(&self.collections) {
            log::error!("Failed to save snapshot, rolling back: {}", e);
            self.collections = previous;
            return Err(e.into());
        }

        self.view.refresh(section, &self.collections, self.clock.now());
        Ok(Outcome::Applied)
    }
}

fn required(text: &str, field: RequiredField) -> Result<&str, StoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StoreError::Validation(field));
    }
    Ok(text)
}

fn log_outcome(action: &str, id: Uuid, outcome: Outcome) {
    match outcome {
        Outcome::Applied => log::info!("{} {}: applied", action, id),
        Outcome::NotFound => log::debug!("{} {}: no such record", action, id),
        Outcome::Ambiguous => log::debug!("{} {}: ambiguous id", action, id),
        Outcome::Declined => log::debug!("{} {}: not confirmed", action, id),
    }
}
