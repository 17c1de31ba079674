//! Derived figures shown next to the collections. Recomputed on every
//! render, never stored.

use chrono::{DateTime, Utc};

use super::habit::Habit;
use super::task::Task;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Percentage of completed items, rounded half up; 0 when there are none.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub completion_rate: u32,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total,
            completed,
            completion_rate: completion_rate(completed, total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HabitProgress {
    /// Whole days since the habit started; negative if the start lies in the future.
    pub days_passed: i64,
    pub current_days: u32,
    pub target_days: u32,
    pub percent: f64,
}

impl HabitProgress {
    pub fn of(habit: &Habit, now: DateTime<Utc>) -> Self {
        let target_days = habit.target_days.max(1);
        let elapsed_ms = (now - habit.start_date).num_milliseconds();
        let days_passed = elapsed_ms.div_euclid(MILLIS_PER_DAY);
        let current_days = days_passed.clamp(0, i64::from(target_days)) as u32;

        Self {
            days_passed,
            current_days,
            target_days,
            percent: 100.0 * f64::from(current_days) / f64::from(target_days),
        }
    }

    pub fn rounded_percent(&self) -> u32 {
        self.percent.round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.current_days >= self.target_days
    }
}
