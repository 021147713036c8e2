use crate::error::{FixtureError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_DIR_NAME: &str = "ideoz-test-files";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// Directory the fixtures are written into.
    pub working_dir: PathBuf,
    /// Leave generated files on disk when a session is dropped.
    #[serde(default)]
    pub keep_files: bool,
}

impl FixtureConfig {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            keep_files: false,
        }
    }

    /// Read `FIXTURE_DIR` and `FIXTURE_KEEP`, falling back to defaults when unset.
    pub fn from_env() -> Result<Self> {
        let working_dir = std::env::var("FIXTURE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join(DEFAULT_DIR_NAME));

        let keep_files = match std::env::var("FIXTURE_KEEP") {
            Ok(value) => parse_flag("FIXTURE_KEEP", &value)?,
            Err(_) => false,
        };

        Ok(Self {
            working_dir,
            keep_files,
        })
    }

    /// Distinct subdirectory for a parallel test worker.
    pub fn worker_dir(&self, worker_id: usize) -> Self {
        Self {
            working_dir: self.working_dir.join(format!("worker-{}", worker_id)),
            keep_files: self.keep_files,
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(FixtureError::Config(format!(
            "{} must be a boolean flag, got '{}'",
            name, other
        ))),
    }
}

/// Install the env_logger backend. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
