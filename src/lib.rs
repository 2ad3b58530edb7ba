pub mod command;
pub mod config;
pub mod error;
pub mod loader;
pub mod render;
pub mod shell;

pub use command::Command;
pub use config::{Config, OutputFormat};
pub use error::{Result, TaskSchedError};
pub use loader::{load_file, load_registry, parse_records, BootRecord};
pub use shell::Shell;

// Re-export the core so callers need only one dependency
pub use registry;
