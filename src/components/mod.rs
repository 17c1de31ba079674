pub mod empty_state;
pub mod goal_card;
pub mod habit_chart;
pub mod task_row;

use uuid::Uuid;

/// Leading characters of an id, enough to address a record from the CLI.
pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}
