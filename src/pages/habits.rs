use std::fmt;

use chrono::{DateTime, Utc};

use crate::components::empty_state::EmptyState;
use crate::components::habit_chart::HabitChart;
use crate::core::habit::Habit;
use crate::fl;

use super::Listing;

#[derive(Debug, Clone, PartialEq)]
pub struct HabitsPage {
    pub listing: Listing<HabitChart>,
}

/// Progress is computed against `now` on every call.
pub fn habits_page(habits: &[Habit], now: DateTime<Utc>) -> HabitsPage {
    let charts = habits.iter().map(|habit| HabitChart::new(habit, now)).collect();
    HabitsPage {
        listing: Listing::new(charts, || EmptyState::new("\u{2728}", fl!("habits-empty"))),
    }
}

impl fmt::Display for HabitsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.listing)
    }
}
