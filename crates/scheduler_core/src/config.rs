//! Environment-driven configuration.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TODO_DBFILE` | `scheduler.db` | SQLite database file |
//! | `TODO_LOG_LEVEL` | by build mode | `trace`..`error` |
//! | `TODO_LOG_DIR` | unset | absolute log directory; unset disables file logs |
//! | `TODO_LIST_LIMIT` | `50` | max tasks per list/search, `1..=500` |
//!
//! Blank values count as unset.

use crate::logging::{default_log_level, normalize_level};
use crate::service::task_service::DEFAULT_LIST_LIMIT;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_FILE: &str = "TODO_DBFILE";
pub const ENV_LOG_LEVEL: &str = "TODO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TODO_LOG_DIR";
pub const ENV_LIST_LIMIT: &str = "TODO_LIST_LIMIT";

const DEFAULT_DB_FILE: &str = "scheduler.db";
const LIST_LIMIT_MAX: u32 = 500;

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub db_file: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
    pub list_limit: u32,
}

/// A configuration variable holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} `{}`: {}", self.key, self.value, self.reason)
    }
}

impl Error for ConfigError {}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            db_file: PathBuf::from(DEFAULT_DB_FILE),
            log_level: default_log_level(),
            log_dir: None,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl SchedulerConfig {
    /// Loads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(db_file) = get(ENV_DB_FILE) {
            config.db_file = PathBuf::from(db_file);
        }

        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level =
                normalize_level(&level).map_err(|reason| ConfigError {
                    key: ENV_LOG_LEVEL,
                    value: level.clone(),
                    reason,
                })?;
        }

        if let Some(dir) = get(ENV_LOG_DIR) {
            let path = PathBuf::from(&dir);
            if !path.is_absolute() {
                return Err(ConfigError {
                    key: ENV_LOG_DIR,
                    value: dir,
                    reason: "must be an absolute path".to_string(),
                });
            }
            config.log_dir = Some(path);
        }

        if let Some(limit) = get(ENV_LIST_LIMIT) {
            config.list_limit = limit
                .parse::<u32>()
                .ok()
                .filter(|value| (1..=LIST_LIMIT_MAX).contains(value))
                .ok_or_else(|| ConfigError {
                    key: ENV_LIST_LIMIT,
                    value: limit.clone(),
                    reason: format!("expected an integer between 1 and {LIST_LIMIT_MAX}"),
                })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{SchedulerConfig, ENV_DB_FILE, ENV_LIST_LIMIT, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn load(vars: &[(&str, &str)]) -> Result<SchedulerConfig, super::ConfigError> {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        SchedulerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]).expect("defaults are valid");
        assert_eq!(config, SchedulerConfig::default());
        assert_eq!(config.db_file, PathBuf::from("scheduler.db"));
        assert_eq!(config.list_limit, 50);
    }

    #[test]
    fn reads_all_variables() {
        let config = load(&[
            (ENV_DB_FILE, "/var/lib/todo/tasks.db"),
            (ENV_LOG_LEVEL, "Warning"),
            (ENV_LOG_DIR, "/var/log/todo"),
            (ENV_LIST_LIMIT, "20"),
        ])
        .expect("valid config");
        assert_eq!(config.db_file, PathBuf::from("/var/lib/todo/tasks.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/todo")));
        assert_eq!(config.list_limit, 20);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[(ENV_DB_FILE, "  "), (ENV_LOG_DIR, "")]).expect("valid config");
        assert_eq!(config.db_file, PathBuf::from("scheduler.db"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn rejects_bad_values() {
        let err = load(&[(ENV_LIST_LIMIT, "0")]).expect_err("zero limit");
        assert_eq!(err.key, ENV_LIST_LIMIT);
        let err = load(&[(ENV_LOG_DIR, "logs")]).expect_err("relative dir");
        assert_eq!(err.key, ENV_LOG_DIR);
        let err = load(&[(ENV_LOG_LEVEL, "loud")]).expect_err("unknown level");
        assert!(err.to_string().contains("TODO_LOG_LEVEL"));
    }
}
