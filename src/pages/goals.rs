use std::fmt;

use crate::components::empty_state::EmptyState;
use crate::components::goal_card::GoalCard;
use crate::core::goal::Goal;
use crate::fl;

use super::{DateStyle, Listing};

#[derive(Debug, Clone, PartialEq)]
pub struct GoalsPage {
    pub listing: Listing<GoalCard>,
}

pub fn goals_page(goals: &[Goal], dates: &DateStyle) -> GoalsPage {
    let cards = goals.iter().map(|goal| GoalCard::new(goal, dates)).collect();
    GoalsPage {
        listing: Listing::new(cards, || EmptyState::new("\u{1F3AF}", fl!("goals-empty"))),
    }
}

impl fmt::Display for GoalsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.listing)
    }
}
