use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskSchedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Registry error: {0}")]
    Registry(#[from] registry::RegistryError),

    #[error("Bootstrap error at line {line}: {reason}")]
    Bootstrap { line: usize, reason: String },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaskSchedError>;
