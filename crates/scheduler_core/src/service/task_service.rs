//! Task use-case service.
//!
//! # Responsibility
//! - Validate and normalize tasks before create/update.
//! - Run the completion workflow (delete one-shot, reschedule recurring).
//! - Route list/search input to the matching repository query.
//!
//! # Invariants
//! - Every `*_at` method takes the reference instant explicitly; the plain
//!   variants read the local clock once and delegate.
//! - A failed normalization or rule evaluation performs no mutation.

use crate::model::date::{format_date, local_now};
use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::task_repo::{RepoError, TaskRepository};
use crate::search::date_query::{SearchDateError, TaskFilter};
use crate::service::normalize::{completion_action, normalize_task, CompletionAction, NormalizeError};
use chrono::NaiveDateTime;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum tasks returned by list/search when not configured otherwise.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Caller-provided fields are incomplete.
    Validation(TaskValidationError),
    /// Date or repeat rule rejected by normalization.
    Date(NormalizeError),
    /// Search input looked like a date but could not be converted.
    Search(SearchDateError),
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Date(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Date(err) => Some(err),
            Self::Search(err) => Some(err),
            Self::TaskNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<NormalizeError> for TaskServiceError {
    fn from(value: NormalizeError) -> Self {
        Self::Date(value)
    }
}

impl From<SearchDateError> for TaskServiceError {
    fn from(value: SearchDateError) -> Self {
        Self::Search(value)
    }
}

pub type ServiceResult<T> = Result<T, TaskServiceError>;

/// Scheduling facade over a repository implementation.
pub struct TaskService<R: TaskRepository> {
    repo: R,
    list_limit: u32,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service with the default list limit.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Overrides the list/search limit; zero falls back to the default.
    pub fn with_list_limit(mut self, limit: u32) -> Self {
        self.list_limit = if limit == 0 { DEFAULT_LIST_LIMIT } else { limit };
        self
    }

    /// Effective list/search limit.
    pub fn list_limit(&self) -> u32 {
        self.list_limit
    }

    /// Creates a task using the local clock. See [`Self::create_task_at`].
    pub fn create_task(&self, task: Task) -> ServiceResult<Task> {
        self.create_task_at(task, local_now())
    }

    /// Validates, normalizes and stores a new task.
    ///
    /// Returns the stored task with its assigned id and normalized date.
    pub fn create_task_at(&self, mut task: Task, now: NaiveDateTime) -> ServiceResult<Task> {
        task.id = None;
        prepare_task(&mut task, now).inspect_err(|err| {
            warn!("event=task_create module=service status=rejected error={err}");
        })?;

        let id = self.repo.create_task(&task)?;
        task.id = Some(id);
        info!(
            "event=task_create module=service status=ok task_id={id} date={} recurring={}",
            task.date,
            task.repeat_rule().is_some()
        );
        Ok(task)
    }

    /// Updates a task using the local clock. See [`Self::update_task_at`].
    pub fn update_task(&self, task: Task) -> ServiceResult<Task> {
        self.update_task_at(task, local_now())
    }

    /// Validates, normalizes and fully replaces an existing task.
    pub fn update_task_at(&self, mut task: Task, now: NaiveDateTime) -> ServiceResult<Task> {
        let id = task.require_id()?;
        prepare_task(&mut task, now).inspect_err(|err| {
            warn!("event=task_update module=service status=rejected task_id={id} error={err}");
        })?;

        self.repo.update_task(&task)?;
        info!(
            "event=task_update module=service status=ok task_id={id} date={}",
            task.date
        );
        Ok(task)
    }

    /// Gets one task by id without touching its date.
    pub fn get_task(&self, id: TaskId) -> ServiceResult<Task> {
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    /// Deletes one task by id.
    pub fn delete_task(&self, id: TaskId) -> ServiceResult<()> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    /// Marks a task done using the local clock. See [`Self::complete_task_at`].
    pub fn complete_task(&self, id: TaskId) -> ServiceResult<CompletionAction> {
        self.complete_task_at(id, local_now())
    }

    /// Marks a task done.
    ///
    /// One-shot tasks are deleted. Recurring tasks get only their date
    /// replaced by the next occurrence after `now`'s day.
    ///
    /// The fetch, compute and write steps are not atomic; two concurrent
    /// completions of the same task may both read the old date.
    pub fn complete_task_at(&self, id: TaskId, now: NaiveDateTime) -> ServiceResult<CompletionAction> {
        let task = self.get_task(id)?;
        let action = completion_action(&task, now.date()).inspect_err(|err| {
            warn!("event=task_done module=service status=error task_id={id} error={err}");
        })?;

        match &action {
            CompletionAction::Delete => self.repo.delete_task(id)?,
            CompletionAction::Reschedule(date) => self.repo.update_date(id, date)?,
        }
        info!("event=task_done module=service status=ok task_id={id} action={action:?}");
        Ok(action)
    }

    /// Lists tasks using the local clock. See [`Self::list_tasks_at`].
    pub fn list_tasks(&self, search: &str) -> ServiceResult<Vec<Task>> {
        self.list_tasks_at(search, local_now())
    }

    /// Lists upcoming tasks, tasks on a `DD.MM.YYYY` day, or upcoming tasks
    /// matching free text, depending on `search`.
    pub fn list_tasks_at(&self, search: &str, now: NaiveDateTime) -> ServiceResult<Vec<Task>> {
        let today = format_date(now.date());
        let tasks = match TaskFilter::from_search(search)? {
            TaskFilter::Upcoming => self.repo.list_upcoming(&today, self.list_limit)?,
            TaskFilter::OnDate(date) => self.repo.search_by_date(&date, self.list_limit)?,
            TaskFilter::Text(pattern) => {
                self.repo
                    .search_by_text(&pattern, &today, self.list_limit)?
            }
        };
        Ok(tasks)
    }
}

fn prepare_task(task: &mut Task, now: NaiveDateTime) -> ServiceResult<()> {
    task.validate()?;
    normalize_task(task, now)?;
    Ok(())
}
