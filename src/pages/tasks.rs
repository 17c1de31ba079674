use std::fmt;

use crate::components::empty_state::EmptyState;
use crate::components::task_row::TaskRow;
use crate::core::progress::TaskStats;
use crate::core::task::{Task, TaskFilter};
use crate::fl;

use super::{DateStyle, Listing};

#[derive(Debug, Clone, PartialEq)]
pub struct TasksPage {
    pub filter: TaskFilter,
    pub stats: TaskStats,
    pub listing: Listing<TaskRow>,
}

/// Build the task tab for one filter. Statistics always cover every task.
pub fn tasks_page(tasks: &[Task], filter: TaskFilter, dates: &DateStyle) -> TasksPage {
    let rows = filter
        .apply(tasks)
        .into_iter()
        .map(|task| TaskRow::new(task, dates))
        .collect();

    TasksPage {
        filter,
        stats: TaskStats::from_tasks(tasks),
        listing: Listing::new(rows, || empty_state(filter)),
    }
}

fn empty_state(filter: TaskFilter) -> EmptyState {
    match filter {
        TaskFilter::All => EmptyState::new("\u{1F4CB}", fl!("tasks-empty")),
        TaskFilter::Pending => EmptyState::new("\u{2714}", fl!("tasks-pending-empty")),
        TaskFilter::Completed => EmptyState::new("\u{1F3AF}", fl!("tasks-completed-empty")),
    }
}

pub fn filter_label(filter: TaskFilter) -> String {
    match filter {
        TaskFilter::All => fl!("tasks-all"),
        TaskFilter::Pending => fl!("tasks-pending"),
        TaskFilter::Completed => fl!("tasks-completed"),
    }
}

impl fmt::Display for TasksPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} | {}",
            filter_label(self.filter),
            fl!(
                "tasks-stats",
                total = self.stats.total.to_string(),
                completed = self.stats.completed.to_string(),
                rate = self.stats.completion_rate.to_string()
            )
        )?;
        write!(f, "{}", self.listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tasks() -> Vec<Task> {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let mut done = Task::new("Done thing", now);
        done.completed = true;
        vec![Task::new("Open thing", now), done, Task::new("Another", now)]
    }

    #[test]
    fn filters_select_rows() {
        let tasks = tasks();
        let all = tasks_page(&tasks, TaskFilter::All, &DateStyle::iso());
        assert_eq!(all.listing.items().len(), 3);

        let pending = tasks_page(&tasks, TaskFilter::Pending, &DateStyle::iso());
        let titles: Vec<&str> = pending.listing.items().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Open thing", "Another"]);

        let completed = tasks_page(&tasks, TaskFilter::Completed, &DateStyle::iso());
        assert_eq!(completed.listing.items().len(), 1);
        assert!(completed.listing.items()[0].completed);
    }

    #[test]
    fn stats_cover_all_tasks_regardless_of_filter() {
        let tasks = tasks();
        let page = tasks_page(&tasks, TaskFilter::Completed, &DateStyle::iso());
        assert_eq!(page.stats.total, 3);
        assert_eq!(page.stats.completed, 1);
        assert_eq!(page.stats.completion_rate, 33);
    }

    #[test]
    fn empty_placeholders_per_filter() {
        let empty = tasks_page(&[], TaskFilter::All, &DateStyle::iso());
        assert_eq!(
            empty.listing.empty_state().map(|s| s.message.as_str()),
            Some("No tasks yet. Add one to get started!")
        );
        assert_eq!(empty.stats.completion_rate, 0);

        let all_done: Vec<Task> = tasks().into_iter().filter(|t| t.completed).collect();
        let pending = tasks_page(&all_done, TaskFilter::Pending, &DateStyle::iso());
        assert_eq!(
            pending.listing.empty_state().map(|s| s.message.as_str()),
            Some("All caught up!")
        );

        let none_done: Vec<Task> = tasks().into_iter().filter(|t| !t.completed).collect();
        let completed = tasks_page(&none_done, TaskFilter::Completed, &DateStyle::iso());
        assert_eq!(
            completed.listing.empty_state().map(|s| s.message.as_str()),
            Some("No completed tasks yet.")
        );
    }

    #[test]
    fn text_shows_stats_line() {
        let text = tasks_page(&tasks(), TaskFilter::All, &DateStyle::iso()).to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "All tasks | 3 total, 1 completed, 33% done");
        assert_eq!(text.lines().count(), 4);
    }
}
