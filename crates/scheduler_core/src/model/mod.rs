//! Domain model for scheduled tasks.
//!
//! # Responsibility
//! - Define the task record exchanged with storage and callers.
//! - Own the canonical `YYYYMMDD` date text representation.
//!
//! # Invariants
//! - Stored and transmitted dates are always canonical 8-digit text.
//! - Every persisted task carries a non-blank title.

pub mod date;
pub mod task;
