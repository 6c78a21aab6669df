//! Task search input handling.
//!
//! # Responsibility
//! - Tell human-entered dates (`DD.MM.YYYY`) apart from free-text search.
//! - Translate search input into a storage-level filter.
//!
//! # Invariants
//! - Search input never mutates stored tasks.
//! - Date search is converted to canonical `YYYYMMDD` before reaching storage.

pub mod date_query;
