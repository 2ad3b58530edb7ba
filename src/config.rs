use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, TaskSchedError};
use registry::TaskId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tasks_path: PathBuf,
    pub default_task_id: TaskId,
    pub log_level: String,
    pub output: OutputFormat,
    pub prompt: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new("task_scheduler.txt")
    }
}

impl Config {
    pub fn new(tasks_path: impl Into<PathBuf>) -> Self {
        Self {
            tasks_path: tasks_path.into(),
            default_task_id: registry::DEFAULT_TASK_ID,
            log_level: "info".to_string(),
            output: OutputFormat::Table,
            prompt: true,
        }
    }

    /// Reads a JSON config file. Missing fields fall back to the defaults.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.max_level()?;
        Ok(())
    }

    pub fn max_level(&self) -> Result<tracing::Level> {
        tracing::Level::from_str(&self.log_level).map_err(|_| {
            TaskSchedError::InvalidConfig(format!("Unknown log level: {}", self.log_level))
        })
    }
}
