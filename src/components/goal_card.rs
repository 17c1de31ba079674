use std::fmt;

use uuid::Uuid;

use crate::core::goal::Goal;
use crate::fl;
use crate::pages::DateStyle;

use super::short_id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalCard {
    pub id: Uuid,
    pub title: String,
    /// "Target: ..." or the no-deadline label.
    pub target: String,
    pub description: Option<String>,
}

impl GoalCard {
    pub fn new(goal: &Goal, dates: &DateStyle) -> Self {
        let target = match goal.deadline {
            Some(date) => fl!("goal-target", date = dates.format(date)),
            None => fl!("goal-no-deadline"),
        };
        Self {
            id: goal.id,
            title: goal.title.clone(),
            target,
            description: (!goal.description.is_empty()).then(|| goal.description.clone()),
        }
    }
}

impl fmt::Display for GoalCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  {}", short_id(self.id), self.title)?;
        write!(f, "    {}", self.target)?;
        if let Some(ref description) = self.description {
            write!(f, "\n    {}", description)?;
        }
        Ok(())
    }
}
