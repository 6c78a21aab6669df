//! Repository layer for scheduled tasks.
//!
//! # Responsibility
//! - Define the storage contract the task service depends on.
//! - Isolate SQLite query details from scheduling policy.
//!
//! # Invariants
//! - Repository writes enforce `Task::validate_for_storage()`.
//! - Missing rows surface as `RepoError::NotFound`, not as silent no-ops.

pub mod task_repo;
