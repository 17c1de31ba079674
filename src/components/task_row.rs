use std::fmt;

use uuid::Uuid;

use crate::core::task::{Priority, Task};
use crate::fl;
use crate::pages::DateStyle;

use super::short_id;

/// One task as shown in a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: Uuid,
    pub title: String,
    pub priority: Priority,
    pub badge: &'static str,
    /// "Due: ..." label, present only when the task has a due date.
    pub due: Option<String>,
    /// The task description, present only when it is non-empty.
    pub notes: Option<String>,
    pub completed: bool,
}

impl TaskRow {
    pub fn new(task: &Task, dates: &DateStyle) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            priority: task.priority,
            badge: task.priority.badge(),
            due: task
                .due_date
                .map(|date| fl!("task-due", date = dates.format(date))),
            notes: task.has_notes().then(|| task.description.clone()),
            completed: task.completed,
        }
    }
}

impl fmt::Display for TaskRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.completed { "[x]" } else { "[ ]" };
        write!(f, "{} {}  {}  {}", check, short_id(self.id), self.title, self.badge)?;
        if let Some(ref due) = self.due {
            write!(f, "  {}", due)?;
        }
        if self.notes.is_some() {
            write!(f, "  ({})", fl!("task-has-notes"))?;
        }
        Ok(())
    }
}
