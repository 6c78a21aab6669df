//! Command-line entry point for the task scheduler.
//!
//! # Responsibility
//! - Map subcommands onto `scheduler_core` use-cases.
//! - Print task data in the JSON wire format; `nextdate` prints plain text.

mod cli;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use cli::{CliArgs, Command};
use log::info;
use scheduler_core::db::open_db;
use scheduler_core::model::date::local_now;
use scheduler_core::{
    init_logging, next_date, parse_date, SchedulerConfig, SqliteTaskRepository, Task, TaskService,
};
use serde::Serialize;
use std::process::ExitCode;

#[derive(Serialize)]
struct IdResponse {
    id: String,
}

#[derive(Serialize)]
struct TasksResponse<'a> {
    tasks: &'a [Task],
}

#[derive(Serialize)]
struct EmptyResponse {}

fn main() -> ExitCode {
    match run(CliArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<()> {
    let mut config = SchedulerConfig::from_env()?;
    if let Some(db) = args.db {
        config.db_file = db;
    }
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, &log_dir.to_string_lossy()).map_err(anyhow::Error::msg)?;
    }

    match args.command {
        Command::NextDate { now, date, repeat } => print_next_date(now.as_deref(), &date, &repeat),
        command => run_task_command(command, &config),
    }
}

fn print_next_date(now: Option<&str>, date: &str, repeat: &str) -> Result<()> {
    if date.is_empty() || repeat.is_empty() {
        bail!("date and repeat are required");
    }
    let next = next_date(reference_day(now)?, date, repeat)?;
    info!("event=next_date module=cli status=ok date={date} repeat={repeat} next={next}");
    println!("{next}");
    Ok(())
}

/// Parses the `now` argument, falling back to the local day shared with the service.
fn reference_day(now: Option<&str>) -> Result<NaiveDate> {
    match now.filter(|value| !value.is_empty()) {
        Some(value) => match parse_date(value) {
            Some(day) => Ok(day),
            None => bail!("invalid now `{value}`: expected YYYYMMDD"),
        },
        None => Ok(local_now().date()),
    }
}

fn run_task_command(command: Command, config: &SchedulerConfig) -> Result<()> {
    let conn = open_db(&config.db_file)
        .with_context(|| format!("cannot open database `{}`", config.db_file.display()))?;
    let service =
        TaskService::new(SqliteTaskRepository::try_new(&conn)?).with_list_limit(config.list_limit);

    match command {
        Command::NextDate { .. } => bail!("nextdate does not use the task database"),
        Command::Add(fields) => {
            let task = service.create_task(fields.into_task())?;
            print_json(&IdResponse {
                id: task.id.map_or_else(String::new, |id| id.to_string()),
            })
        }
        Command::Get { id } => print_json(&service.get_task(id)?),
        Command::Update { id, fields } => {
            let mut task = fields.into_task();
            task.id = Some(id);
            service.update_task(task)?;
            print_json(&EmptyResponse {})
        }
        Command::Delete { id } => {
            service.delete_task(id)?;
            print_json(&EmptyResponse {})
        }
        Command::Done { id } => {
            service.complete_task(id)?;
            print_json(&EmptyResponse {})
        }
        Command::List { search } => {
            let tasks = service.list_tasks(&search)?;
            print_json(&TasksResponse { tasks: &tasks })
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
