use std::io::Write;

use chrono::{DateTime, Utc};

use crate::config::LodestarConfig;
use crate::core::clock::{Clock, SystemClock};
use crate::core::collections::{Collections, Section};
use crate::core::task::TaskFilter;
use crate::message::Message;
use crate::pages::{Page, ViewOptions};
use crate::storage::{FileStorage, KeyValueStorage, Persistence};
use crate::store::{CollectionStore, Confirm, IdMatch, Outcome, StoreError, ViewSink};

/// Prints each refreshed page as plain text.
pub struct TerminalView<W> {
    out: W,
    options: ViewOptions,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, options: ViewOptions) -> Self {
        Self { out, options }
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> ViewSink for TerminalView<W> {
    fn refresh(&mut self, section: Section, collections: &Collections, now: DateTime<Utc>) {
        let page = Page::build(section, collections, &self.options, now);
        if let Err(e) = write!(self.out, "{}", page).and_then(|_| self.out.flush()) {
            log::warn!("Failed to draw {:?}: {}", section, e);
        }
    }

    fn set_task_filter(&mut self, filter: TaskFilter) {
        self.options.task_filter = filter;
    }
}

/// Dispatches user actions to the store and tracks the selected tab.
pub struct Lodestar<S, C, V> {
    store: CollectionStore<S, C, V>,
    active_tab: Section,
}

impl<V: ViewSink> Lodestar<FileStorage, SystemClock, V> {
    /// Open the snapshot configured in `config`.
    pub fn from_config(config: &LodestarConfig, view: V) -> Self {
        let persistence = Persistence::new(config.storage(), config.slot.clone());
        Self::new(CollectionStore::open(persistence, SystemClock, view))
    }
}

impl<S, C, V> Lodestar<S, C, V>
where
    S: KeyValueStorage,
    C: Clock,
    V: ViewSink,
{
    pub fn new(store: CollectionStore<S, C, V>) -> Self {
        Self {
            store,
            active_tab: Section::Tasks,
        }
    }

    pub fn store(&self) -> &CollectionStore<S, C, V> {
        &self.store
    }

    pub fn active_tab(&self) -> Section {
        self.active_tab
    }

    pub fn update(&mut self, message: Message, confirm: &mut dyn Confirm) -> Result<Outcome, StoreError> {
        let section = message.section();
        let outcome = match message {
            Message::SelectTab(section) => {
                self.store.refresh(section);
                Outcome::Applied
            }

            Message::SetTaskFilter(filter) => {
                self.store.view_mut().set_task_filter(filter);
                self.store.refresh(Section::Tasks);
                Outcome::Applied
            }

            Message::AddTask {
                title,
                description,
                priority,
                due_date,
            } => {
                self.store.add_task(&title, &description, priority, due_date)?;
                Outcome::Applied
            }

            Message::ToggleTask(ref text) => match self.store.match_id(Section::Tasks, text) {
                IdMatch::Found(id) => self.store.toggle_task(id)?,
                unresolved => no_match(text, unresolved),
            },

            Message::DeleteTask(ref text) => match self.store.match_id(Section::Tasks, text) {
                IdMatch::Found(id) => self.store.delete_task(id, confirm)?,
                unresolved => no_match(text, unresolved),
            },

            Message::AddGoal {
                title,
                deadline,
                description,
            } => {
                self.store.add_goal(&title, deadline, &description)?;
                Outcome::Applied
            }

            Message::RemoveGoal(ref text) => match self.store.match_id(Section::Goals, text) {
                IdMatch::Found(id) => self.store.remove_goal(id, confirm)?,
                unresolved => no_match(text, unresolved),
            },

            Message::AddHabit { name, target_days } => {
                self.store.add_habit(&name, target_days)?;
                Outcome::Applied
            }

            Message::RemoveHabit(ref text) => match self.store.match_id(Section::Habits, text) {
                IdMatch::Found(id) => self.store.remove_habit(id, confirm)?,
                unresolved => no_match(text, unresolved),
            },
        };
        self.active_tab = section;
        Ok(outcome)
    }
}

fn no_match(text: &str, lookup: IdMatch) -> Outcome {
    if lookup == IdMatch::Ambiguous {
        log::debug!("{:?} matches more than one record", text);
        return Outcome::Ambiguous;
    }
    log::debug!("No record matches {:?}", text);
    Outcome::NotFound
}
