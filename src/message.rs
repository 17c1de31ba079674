use chrono::NaiveDate;

use crate::core::collections::Section;
use crate::core::task::{Priority, TaskFilter};

/// A user action. Record ids arrive as typed text (full id or prefix)
/// and are resolved against the current collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    SelectTab(Section),
    SetTaskFilter(TaskFilter),

    // Tasks
    AddTask {
        title: String,
        description: String,
        priority: Priority,
        due_date: Option<NaiveDate>,
    },
    ToggleTask(String),
    DeleteTask(String),

    // Goals
    AddGoal {
        title: String,
        deadline: Option<NaiveDate>,
        description: String,
    },
    RemoveGoal(String),

    // Habits
    AddHabit {
        name: String,
        target_days: Option<i64>,
    },
    RemoveHabit(String),
}

impl Message {
    /// The tab whose contents this message affects.
    pub fn section(&self) -> Section {
        match self {
            Self::SelectTab(section) => *section,
            Self::SetTaskFilter(_) | Self::AddTask { .. } | Self::ToggleTask(_) | Self::DeleteTask(_) => {
                Section::Tasks
            }
            Self::AddGoal { .. } | Self::RemoveGoal(_) => Section::Goals,
            Self::AddHabit { .. } | Self::RemoveHabit(_) => Section::Habits,
        }
    }
}
