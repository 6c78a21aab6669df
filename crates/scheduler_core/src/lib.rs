//! Core scheduling logic for the personal task scheduler.
//! This crate is the single source of truth for recurrence and due-date rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod recurrence;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{ConfigError, SchedulerConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::date::{format_date, parse_date, DATE_FORMAT};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use recurrence::{next_date, weekday_number, RepeatRule, RuleError};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use search::date_query::{is_search_date, search_date_to_db, SearchDateError, TaskFilter};
pub use service::normalize::{
    completion_action, normalize_date, normalize_task, CompletionAction, NormalizeError,
};
pub use service::task_service::{ServiceResult, TaskService, TaskServiceError, DEFAULT_LIST_LIMIT};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
