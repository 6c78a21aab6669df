use scheduler_core::db::open_db_in_memory;
use scheduler_core::{RepoError, SqliteTaskRepository, Task, TaskRepository, TaskValidationError};
use rusqlite::Connection;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = Task::new("20240115", "pay rent")
        .with_comment("bank transfer")
        .with_repeat("m 1");
    let id = repo.create_task(&task).unwrap();

    let loaded = repo.get_task(id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.date, "20240115");
    assert_eq!(loaded.title, "pay rent");
    assert_eq!(loaded.comment, "bank transfer");
    assert_eq!(loaded.repeat, "m 1");
}

#[test]
fn get_missing_task_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    assert!(repo.get_task(404).unwrap().is_none());
}

#[test]
fn writes_require_title_and_canonical_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let err = repo.create_task(&Task::new("20240115", " ")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(TaskValidationError::EmptyTitle)));

    let err = repo.create_task(&Task::new("2024-01-15", "x")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(TaskValidationError::NonCanonicalDate(_))
    ));
}

#[test]
fn update_replaces_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&Task::new("20240115", "draft").with_comment("old"))
        .unwrap();
    let mut task = Task::new("20240120", "final").with_repeat("d 2");
    task.id = Some(id);
    repo.update_task(&task).unwrap();

    let loaded = repo.get_task(id).unwrap().unwrap();
    assert_eq!(loaded, task);
}

#[test]
fn update_without_id_or_for_missing_row_fails() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = Task::new("20240115", "orphan");
    let err = repo.update_task(&task).unwrap_err();
    assert!(matches!(err, RepoError::Validation(TaskValidationError::MissingId)));

    let mut task = task;
    task.id = Some(77);
    let err = repo.update_task(&task).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(77)));
}

#[test]
fn update_date_changes_only_the_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&Task::new("20240115", "gym").with_repeat("w 1,3,5"))
        .unwrap();
    repo.update_date(id, "20240117").unwrap();

    let loaded = repo.get_task(id).unwrap().unwrap();
    assert_eq!(loaded.date, "20240117");
    assert_eq!(loaded.title, "gym");
    assert_eq!(loaded.repeat, "w 1,3,5");

    assert!(matches!(repo.update_date(id + 1, "20240117"), Err(RepoError::NotFound(_))));
    assert!(matches!(repo.update_date(id, "17.01.2024"), Err(RepoError::Validation(_))));
}

#[test]
fn delete_removes_row_and_reports_missing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo.create_task(&Task::new("20240115", "once")).unwrap();
    repo.delete_task(id).unwrap();

    assert!(repo.get_task(id).unwrap().is_none());
    assert!(matches!(repo.delete_task(id), Err(RepoError::NotFound(found)) if found == id));
}

#[test]
fn list_upcoming_orders_by_date_then_id_and_applies_limit() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    repo.create_task(&Task::new("20240101", "past")).unwrap();
    let late = repo.create_task(&Task::new("20240301", "late")).unwrap();
    let first = repo.create_task(&Task::new("20240201", "first")).unwrap();
    let second = repo.create_task(&Task::new("20240201", "second")).unwrap();

    let tasks = repo.list_upcoming("20240115", 50).unwrap();
    let ids = tasks.iter().map(|task| task.id.unwrap()).collect::<Vec<_>>();
    assert_eq!(ids, vec![first, second, late]);

    let limited = repo.list_upcoming("20240115", 2).unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn search_by_text_matches_title_or_comment_literally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let by_title = repo.create_task(&Task::new("20240201", "Buy milk")).unwrap();
    let by_comment = repo
        .create_task(&Task::new("20240202", "shopping").with_comment("milk and bread"))
        .unwrap();
    repo.create_task(&Task::new("20240101", "old milk")).unwrap();
    let discount = repo.create_task(&Task::new("20240203", "100% done")).unwrap();
    repo.create_task(&Task::new("20240204", "1000 done")).unwrap();

    let hits = repo.search_by_text("milk", "20240115", 50).unwrap();
    let ids = hits.iter().map(|task| task.id.unwrap()).collect::<Vec<_>>();
    assert_eq!(ids, vec![by_title, by_comment]);

    let hits = repo.search_by_text("0%", "20240115", 50).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, Some(discount));
}

#[test]
fn search_by_date_includes_past_days() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo.create_task(&Task::new("20230105", "archived")).unwrap();
    repo.create_task(&Task::new("20230106", "other day")).unwrap();

    let hits = repo.search_by_date("20230105", 50).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, Some(id));
}

#[test]
fn corrupt_persisted_date_is_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO scheduler (date, title) VALUES ('2024-1-5', 'legacy');",
        [],
    )
    .unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let err = repo.list_upcoming("00000101", 50).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteTaskRepository::try_new(&conn) {
        Err(RepoError::MissingRequiredTable(table)) => assert_eq!(table, "scheduler"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unmigrated connection must be rejected"),
    }
}
