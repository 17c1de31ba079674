use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::habit::Habit;
use crate::core::progress::HabitProgress;
use crate::fl;

use super::short_id;

const BAR_WIDTH: usize = 20;

/// Habit display with an elapsed-days progress bar.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitChart {
    pub id: Uuid,
    pub name: String,
    pub progress: HabitProgress,
    /// "current / target days"
    pub days_label: String,
    pub percent_label: String,
}

impl HabitChart {
    pub fn new(habit: &Habit, now: DateTime<Utc>) -> Self {
        let progress = HabitProgress::of(habit, now);
        Self {
            id: habit.id,
            name: habit.name.clone(),
            days_label: fl!(
                "habit-days",
                current = progress.current_days.to_string(),
                target = progress.target_days.to_string()
            ),
            percent_label: format!("{}%", progress.rounded_percent()),
            progress,
        }
    }

    /// Bar width in percent, unrounded.
    pub fn bar_percent(&self) -> f64 {
        self.progress.percent
    }
}

/// Fixed-width text bar for `percent` (0..=100).
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    bar.push_str(&"#".repeat(filled));
    bar.push_str(&".".repeat(width - filled));
    bar.push(']');
    bar
}

impl fmt::Display for HabitChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  {}", short_id(self.id), self.name)?;
        write!(
            f,
            "    {} {}  {}",
            progress_bar(self.bar_percent(), BAR_WIDTH),
            self.days_label,
            self.percent_label
        )
    }
}
