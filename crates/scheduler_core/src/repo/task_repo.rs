//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, date-only update and list/search over the `scheduler` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate_for_storage()` before SQL mutations.
//! - Read paths reject rows with non-canonical dates instead of masking them.
//! - Every list/search result is ordered by `date ASC, id ASC`.

use crate::db::DbError;
use crate::model::date::is_canonical_date;
use crate::model::task::{Task, TaskId, TaskValidationError};
use rusqlite::{params, Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    date,
    title,
    comment,
    repeat
FROM scheduler";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract consumed by the task service.
///
/// `today` arguments are canonical `YYYYMMDD` text; "upcoming" means
/// `date >= today`.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Replaces only the due date.
    fn update_date(&self, id: TaskId, date: &str) -> RepoResult<()>;
    fn list_upcoming(&self, today: &str, limit: u32) -> RepoResult<Vec<Task>>;
    /// Upcoming tasks whose title or comment contains `pattern` literally.
    fn search_by_text(&self, pattern: &str, today: &str, limit: u32) -> RepoResult<Vec<Task>>;
    /// Tasks due exactly on `date`, past or future.
    fn search_by_date(&self, date: &str, limit: u32) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    ///
    /// Fails when the `scheduler` table or one of its columns is missing.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_task_table_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_tasks(&self, sql: &str, params: impl Params) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate_for_storage()?;

        self.conn.execute(
            "INSERT INTO scheduler (date, title, comment, repeat)
             VALUES (?1, ?2, ?3, ?4);",
            params![task.date, task.title, task.comment, task.repeat],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut tasks = self.query_tasks(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(tasks.pop())
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        let id = task.require_id()?;
        task.validate_for_storage()?;

        let changed = self.conn.execute(
            "UPDATE scheduler
             SET
                date = ?1,
                title = ?2,
                comment = ?3,
                repeat = ?4
             WHERE id = ?5;",
            params![task.date, task.title, task.comment, task.repeat, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM scheduler WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn update_date(&self, id: TaskId, date: &str) -> RepoResult<()> {
        if !is_canonical_date(date) {
            return Err(TaskValidationError::NonCanonicalDate(date.to_string()).into());
        }

        let changed = self.conn.execute(
            "UPDATE scheduler SET date = ?1 WHERE id = ?2;",
            params![date, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_upcoming(&self, today: &str, limit: u32) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!(
                "{TASK_SELECT_SQL}
                 WHERE date >= ?1
                 ORDER BY date ASC, id ASC
                 LIMIT ?2;"
            ),
            params![today, limit],
        )
    }

    fn search_by_text(&self, pattern: &str, today: &str, limit: u32) -> RepoResult<Vec<Task>> {
        let like = format!("%{}%", escape_like(pattern));
        self.query_tasks(
            &format!(
                "{TASK_SELECT_SQL}
                 WHERE (title LIKE ?1 ESCAPE '\\' OR comment LIKE ?1 ESCAPE '\\')
                   AND date >= ?2
                 ORDER BY date ASC, id ASC
                 LIMIT ?3;"
            ),
            params![like, today, limit],
        )
    }

    fn search_by_date(&self, date: &str, limit: u32) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!(
                "{TASK_SELECT_SQL}
                 WHERE date = ?1
                 ORDER BY date ASC, id ASC
                 LIMIT ?2;"
            ),
            params![date, limit],
        )
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id: TaskId = row.get("id")?;
    let date: String = row.get("date")?;
    if !is_canonical_date(&date) {
        return Err(RepoError::InvalidData(format!(
            "invalid date `{date}` in scheduler.date for task {id}"
        )));
    }

    Ok(Task {
        id: Some(id),
        date,
        title: row.get("title")?,
        comment: row.get::<_, Option<String>>("comment")?.unwrap_or_default(),
        repeat: row.get::<_, Option<String>>("repeat")?.unwrap_or_default(),
    })
}

fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn ensure_task_table_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "scheduler")? {
        return Err(RepoError::MissingRequiredTable("scheduler"));
    }
    for column in ["id", "date", "title", "comment", "repeat"] {
        if !table_has_column(conn, "scheduler", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "scheduler",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
