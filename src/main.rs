use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use lodestar::application::{Lodestar, TerminalView};
use lodestar::config::LodestarConfig;
use lodestar::core::collections::Section;
use lodestar::core::habit::parse_target_days;
use lodestar::core::task::{Priority, TaskFilter};
use lodestar::fl;
use lodestar::message::Message;
use lodestar::pages::ViewOptions;
use lodestar::store::Outcome;

#[derive(Parser)]
#[command(name = "lodestar")]
#[command(about = "Track tasks, goals and habits")]
struct Cli {
    /// Config file (defaults to the per-user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the data directory from the config.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Do not ask before deleting.
    #[arg(long, short = 'y', global = true, default_value_t = false)]
    yes: bool,
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show tasks.
    Tasks {
        #[arg(long, value_enum, default_value_t = FilterCli::All)]
        filter: FilterCli,
    },
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Show goals.
    Goals,
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },
    /// Show habits.
    Habits,
    Habit {
        #[command(subcommand)]
        command: HabitCommand,
    },
    /// Print the effective configuration.
    Config {
        /// Write the effective configuration to the config file.
        #[arg(long, default_value_t = false)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum TaskCommand {
    Add {
        title: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, value_enum, default_value_t = PriorityCli::Medium)]
        priority: PriorityCli,
        #[arg(long, value_parser = parse_date_arg)]
        due: Option<NaiveDate>,
    },
    Toggle {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum GoalCommand {
    Add {
        title: String,
        #[arg(long, value_parser = parse_date_arg)]
        deadline: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
enum HabitCommand {
    Add {
        name: String,
        /// Target length in days; anything but a positive number means 30.
        #[arg(long, default_value = "")]
        days: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterCli {
    All,
    Pending,
    Completed,
}

impl From<FilterCli> for TaskFilter {
    fn from(value: FilterCli) -> Self {
        match value {
            FilterCli::All => TaskFilter::All,
            FilterCli::Pending => TaskFilter::Pending,
            FilterCli::Completed => TaskFilter::Completed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PriorityCli {
    Low,
    Medium,
    High,
}

impl From<PriorityCli> for Priority {
    fn from(value: PriorityCli) -> Self {
        match value {
            PriorityCli::Low => Priority::Low,
            PriorityCli::Medium => Priority::Medium,
            PriorityCli::High => Priority::High,
        }
    }
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    match lodestar::core::parse_date(value) {
        Ok(Some(date)) => Ok(date),
        Ok(None) => Err("empty date".to_string()),
        Err(e) => Err(format!("expected YYYY-MM-DD: {}", e)),
    }
}

/// Journal logging (`journalctl --user -t lodestar -f`): lodestar at
/// info/debug, everything else at warn.
fn init_logging() {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("lodestar") {
                let max = if lodestar::debug_logging() { log::LevelFilter::Debug } else { log::LevelFilter::Info };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("lodestar".to_string()),
        // No journal socket (containers, non-systemd hosts): run without a logger.
        Err(_) => return,
    };

    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        // Global max must be Debug so lodestar debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }
}

/// Ask on the terminal; anything but "y"/"yes" declines.
fn prompt(message: &str) -> bool {
    print!("{} [y/N] ", message);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn message_for(command: Commands) -> Message {
    match command {
        Commands::Tasks { filter } => Message::SetTaskFilter(filter.into()),
        Commands::Task { command } => match command {
            TaskCommand::Add {
                title,
                notes,
                priority,
                due,
            } => Message::AddTask {
                title,
                description: notes,
                priority: priority.into(),
                due_date: due,
            },
            TaskCommand::Toggle { id } => Message::ToggleTask(id),
            TaskCommand::Delete { id } => Message::DeleteTask(id),
        },
        Commands::Goals => Message::SelectTab(Section::Goals),
        Commands::Goal { command } => match command {
            GoalCommand::Add {
                title,
                deadline,
                notes,
            } => Message::AddGoal {
                title,
                deadline,
                description: notes,
            },
            GoalCommand::Remove { id } => Message::RemoveGoal(id),
        },
        Commands::Habits => Message::SelectTab(Section::Habits),
        Commands::Habit { command } => match command {
            HabitCommand::Add { name, days } => Message::AddHabit {
                name,
                target_days: parse_target_days(&days),
            },
            HabitCommand::Remove { id } => Message::RemoveHabit(id),
        },
        // Handled before the store is opened.
        Commands::Config { .. } => Message::SelectTab(Section::Tasks),
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    lodestar::set_debug_logging(cli.debug);
    init_logging();
    lodestar::localize::localize();

    let config_path = cli.config.clone().unwrap_or_else(LodestarConfig::default_path);
    let mut config = LodestarConfig::load_or_default(&config_path);
    if config.debug_logging {
        lodestar::set_debug_logging(true);
    }
    if let Some(ref dir) = cli.data_dir {
        config.data_directory = dir.clone();
    }
    if cli.yes {
        config.confirm_destructive = false;
    }

    let command = cli.command.unwrap_or(Commands::Tasks { filter: FilterCli::All });

    if let Commands::Config { init } = command {
        if init {
            config.save_to(&config_path)?;
            log::info!("Wrote config to {}", config_path.display());
        }
        println!("# {}", config_path.display());
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    config.ensure_directories()?;
    log::debug!("Using snapshot {}", config.snapshot_path().display());

    let options = ViewOptions {
        dates: config.date_style(),
        ..ViewOptions::default()
    };
    let mut app = Lodestar::from_config(&config, TerminalView::new(io::stdout(), options));

    let message = message_for(command);
    let target = match message {
        Message::ToggleTask(ref id)
        | Message::DeleteTask(ref id)
        | Message::RemoveGoal(ref id)
        | Message::RemoveHabit(ref id) => Some(id.clone()),
        _ => None,
    };

    let confirm_destructive = config.confirm_destructive;
    let mut confirm = |message: &str| !confirm_destructive || prompt(message);

    match app.update(message, &mut confirm) {
        Ok(outcome) => Ok(report(outcome, &target.unwrap_or_default())),
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Tell the user what happened and pick the exit status. An unknown id
/// changes nothing and is not a failure; an ambiguous prefix is.
fn report(outcome: Outcome, target: &str) -> ExitCode {
    match outcome {
        Outcome::Applied => ExitCode::SUCCESS,
        Outcome::Declined => {
            println!("{}", fl!("cli-declined"));
            ExitCode::SUCCESS
        }
        Outcome::NotFound => {
            eprintln!("{}", fl!("cli-no-match", id = target.to_string()));
            ExitCode::SUCCESS
        }
        Outcome::Ambiguous => {
            eprintln!("{}", fl!("cli-ambiguous", id = target.to_string()));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lodestar").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn task_add_maps_to_message() {
        let cli = parse(&["task", "add", "Write spec", "--priority", "high", "--due", "2026-11-01"]);
        let message = message_for(cli.command.unwrap());
        assert_eq!(
            message,
            Message::AddTask {
                title: "Write spec".to_string(),
                description: String::new(),
                priority: Priority::High,
                due_date: NaiveDate::from_ymd_opt(2026, 11, 1),
            }
        );
    }

    #[test]
    fn bad_due_date_is_rejected() {
        let args = ["lodestar", "task", "add", "x", "--due", "tomorrow"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn habit_days_accepts_loose_input() {
        let cli = parse(&["habit", "add", "Read", "--days", "21 days"]);
        assert_eq!(
            message_for(cli.command.unwrap()),
            Message::AddHabit {
                name: "Read".to_string(),
                target_days: Some(21),
            }
        );

        let cli = parse(&["habit", "add", "Read"]);
        assert_eq!(
            message_for(cli.command.unwrap()),
            Message::AddHabit {
                name: "Read".to_string(),
                target_days: None,
            }
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["goal", "remove", "ab12", "--yes", "--data-dir", "/tmp/lodestar"]);
        assert!(cli.yes);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/lodestar")));
        assert_eq!(
            message_for(cli.command.unwrap()),
            Message::RemoveGoal("ab12".to_string())
        );
    }

    #[test]
    fn tasks_filter_selects_view() {
        let cli = parse(&["tasks", "--filter", "pending"]);
        assert_eq!(
            message_for(cli.command.unwrap()),
            Message::SetTaskFilter(TaskFilter::Pending)
        );
    }

    #[test]
    fn only_ambiguous_ids_fail_the_command() {
        assert_eq!(report(Outcome::Applied, ""), ExitCode::SUCCESS);
        assert_eq!(report(Outcome::Declined, "ab12"), ExitCode::SUCCESS);
        assert_eq!(report(Outcome::NotFound, "ab12"), ExitCode::SUCCESS);
        assert_eq!(report(Outcome::Ambiguous, "ab"), ExitCode::FAILURE);
    }

    #[test]
    fn ambiguous_message_names_the_prefix() {
        assert_eq!(
            fl!("cli-ambiguous", id = "ab".to_string()),
            "\"ab\" matches more than one record; type more of the id"
        );
    }
}
