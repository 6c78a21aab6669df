//! Scheduling use-cases.
//!
//! # Responsibility
//! - Apply due-date normalization before any task is persisted.
//! - Orchestrate repository calls for create/update/done/list flows.
//!
//! # Invariants
//! - No task reaches storage without passing through `normalize`.
//! - Fetching a task never changes its date.

pub mod normalize;
pub mod task_service;
