//! View-models for the three tabs. Pure functions of the collections;
//! nothing here mutates state.

pub mod goals;
pub mod habits;
pub mod tasks;

use std::fmt::{self, Write};

use chrono::{DateTime, Locale, NaiveDate, Utc};

use crate::components::empty_state::EmptyState;
use crate::core::DATE_FORMAT;
use crate::core::collections::{Collections, Section};
use crate::core::task::TaskFilter;
use crate::fl;

pub use goals::GoalsPage;
pub use habits::HabitsPage;
pub use tasks::TasksPage;

/// Default display pattern: the locale's own date layout.
pub const LOCALE_DATE_FORMAT: &str = "%x";

/// Display settings shared by all pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub task_filter: TaskFilter,
    pub dates: DateStyle,
}

/// A strftime pattern plus the locale that supplies month names and the
/// `%x` layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStyle {
    pub format: String,
    pub locale: Locale,
}

impl DateStyle {
    pub fn new(format: impl Into<String>, locale: Locale) -> Self {
        Self {
            format: format.into(),
            locale,
        }
    }

    /// `YYYY-MM-DD` whatever the locale.
    pub fn iso() -> Self {
        Self::new(DATE_FORMAT, Locale::POSIX)
    }

    /// Render `date`, falling back to ISO when the pattern cannot render a date.
    pub fn format(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format_localized(&self.format, self.locale)).is_err() {
            return date.format(DATE_FORMAT).to_string();
        }
        out
    }
}

impl Default for DateStyle {
    fn default() -> Self {
        Self::new(LOCALE_DATE_FORMAT, Locale::POSIX)
    }
}

/// Either the rows to show or the placeholder for an empty list.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Empty(EmptyState),
    Items(Vec<T>),
}

impl<T> Listing<T> {
    pub fn new(items: Vec<T>, empty: impl FnOnce() -> EmptyState) -> Self {
        if items.is_empty() {
            Self::Empty(empty())
        } else {
            Self::Items(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Empty(_) => &[],
            Self::Items(items) => items,
        }
    }

    pub fn empty_state(&self) -> Option<&EmptyState> {
        match self {
            Self::Empty(state) => Some(state),
            Self::Items(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Listing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(state) => writeln!(f, "{}", state),
            Self::Items(items) => {
                for item in items {
                    writeln!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Tasks(TasksPage),
    Goals(GoalsPage),
    Habits(HabitsPage),
}

impl Page {
    pub fn build(
        section: Section,
        collections: &Collections,
        options: &ViewOptions,
        now: DateTime<Utc>,
    ) -> Self {
        match section {
            Section::Tasks => Self::Tasks(tasks::tasks_page(
                &collections.tasks,
                options.task_filter,
                &options.dates,
            )),
            Section::Goals => Self::Goals(goals::goals_page(&collections.goals, &options.dates)),
            Section::Habits => Self::Habits(habits::habits_page(&collections.habits, now)),
        }
    }

    pub fn section(&self) -> Section {
        match self {
            Self::Tasks(_) => Section::Tasks,
            Self::Goals(_) => Section::Goals,
            Self::Habits(_) => Section::Habits,
        }
    }

    pub fn empty_state(&self) -> Option<&EmptyState> {
        match self {
            Self::Tasks(page) => page.listing.empty_state(),
            Self::Goals(page) => page.listing.empty_state(),
            Self::Habits(page) => page.listing.empty_state(),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", section_title(self.section()))?;
        match self {
            Self::Tasks(page) => write!(f, "{}", page),
            Self::Goals(page) => write!(f, "{}", page),
            Self::Habits(page) => write!(f, "{}", page),
        }
    }
}

pub fn section_title(section: Section) -> String {
    match section {
        Section::Tasks => fl!("tab-tasks"),
        Section::Goals => fl!("tab-goals"),
        Section::Habits => fl!("tab-habits"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_style_uses_pattern() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(DateStyle::iso().format(date), "2026-03-09");
        assert_eq!(DateStyle::new("%b %-d, %Y", Locale::POSIX).format(date), "Mar 9, 2026");
    }

    #[test]
    fn date_style_follows_locale() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(DateStyle::new(LOCALE_DATE_FORMAT, Locale::de_DE).format(date), "09.03.2026");
        assert_eq!(DateStyle::new(LOCALE_DATE_FORMAT, Locale::en_US).format(date), "03/09/2026");
        assert_eq!(DateStyle::new("%-d %B", Locale::fr_FR).format(date), "9 mars");
    }

    #[test]
    fn date_style_falls_back_on_bad_pattern() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(DateStyle::new("%H:%M", Locale::de_DE).format(date), "2026-03-09");
    }

    #[test]
    fn empty_storage_renders_every_placeholder() {
        let collections = Collections::default();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let options = ViewOptions::default();

        let messages: Vec<String> = Section::ALL
            .iter()
            .map(|section| {
                Page::build(*section, &collections, &options, now)
                    .empty_state()
                    .map(|state| state.message.clone())
                    .unwrap()
            })
            .collect();
        assert_eq!(
            messages,
            vec![
                "No tasks yet. Add one to get started!".to_string(),
                "Set your first goal!".to_string(),
                "Build a habit!".to_string(),
            ]
        );
    }

    #[test]
    fn page_text_has_title_header() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let page = Page::build(Section::Goals, &Collections::default(), &ViewOptions::default(), now);
        let text = page.to_string();
        assert!(text.starts_with("== Goals =="));
        assert!(text.contains("Set your first goal!"));
    }
}
