use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Personal task scheduler with repeat rules.
///
/// Dates are `YYYYMMDD`. Repeat rules: `d N`, `y`, `w 1,3,5`,
/// `m 1,-1 [1,6,12]`.
#[derive(Parser, Debug)]
#[command(name = "scheduler", version = scheduler_core::core_version())]
pub struct CliArgs {
    /// Database file (overrides TODO_DBFILE)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the next occurrence of a repeat rule, or the raw failure
    #[command(name = "nextdate")]
    NextDate {
        /// Reference day (default: today)
        #[arg(long)]
        now: Option<String>,
        /// Start day of the task
        #[arg(long)]
        date: String,
        /// Repeat rule text
        #[arg(long)]
        repeat: String,
    },
    /// Create a task and print its id
    Add(TaskFields),
    /// Print one task
    Get { id: i64 },
    /// Replace all fields of a task
    Update {
        id: i64,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Delete a task
    Delete { id: i64 },
    /// Mark a task done: one-shot tasks are deleted, recurring ones move on
    Done { id: i64 },
    /// List upcoming tasks, or search by `DD.MM.YYYY` date or text
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
}

#[derive(Args, Debug)]
pub struct TaskFields {
    #[arg(long)]
    pub title: String,
    /// Due day (default: today)
    #[arg(long, default_value = "")]
    pub date: String,
    #[arg(long, default_value = "")]
    pub comment: String,
    /// Repeat rule; empty for a one-shot task
    #[arg(long, default_value = "")]
    pub repeat: String,
}

impl TaskFields {
    /// Builds an unsaved task from the flags.
    pub fn into_task(self) -> scheduler_core::Task {
        scheduler_core::Task::new(self.date, self.title)
            .with_comment(self.comment)
            .with_repeat(self.repeat)
    }
}
