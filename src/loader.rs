//! Bootstrap loader for the initial task set.
//!
//! The input is line oriented: a header line followed by records of the form
//! `id;priority;state;wait_key`, with state 0 = running, 1 = ready, 2 = waiting.

use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, TaskSchedError};
use registry::{Priority, TaskId, TaskRegistry, TaskState, WaitKey};

const FIELD_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootRecord {
    /// 1-based line number in the source text.
    pub line: usize,
    pub id: TaskId,
    pub priority: Priority,
    pub state: TaskState,
    pub wait_key: WaitKey,
}

fn bootstrap_error(line: usize, reason: impl Into<String>) -> TaskSchedError {
    TaskSchedError::Bootstrap {
        line,
        reason: reason.into(),
    }
}

fn parse_line(line: usize, text: &str) -> Result<BootRecord> {
    let fields = text
        .split(';')
        .map(|field| {
            let field = field.trim();
            field
                .parse::<i64>()
                .map_err(|_| bootstrap_error(line, format!("'{}' is not an integer", field)))
        })
        .collect::<Result<Vec<_>>>()?;

    if fields.len() != FIELD_COUNT {
        return Err(bootstrap_error(
            line,
            format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        ));
    }

    let state = TaskState::from_code(fields[2])
        .ok_or_else(|| bootstrap_error(line, format!("unknown state code {}", fields[2])))?;

    Ok(BootRecord {
        line,
        id: fields[0],
        priority: fields[1],
        state,
        wait_key: fields[3],
    })
}

/// Parses every record after the header, skipping blank lines.
pub fn parse_records(text: &str) -> Result<Vec<BootRecord>> {
    text.lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(idx + 1, line))
        .collect()
}

/// Builds a registry from bootstrap text. Exactly one running record is
/// required.
pub fn load_registry(text: &str, default_task: TaskId) -> Result<TaskRegistry> {
    let records = parse_records(text)?;

    let mut running = records.iter().filter(|r| r.state == TaskState::Running);
    match (running.next(), running.next()) {
        (Some(_), None) => {}
        (None, _) => {
            return Err(bootstrap_error(
                text.lines().count(),
                "no running task in the initial task set",
            ))
        }
        (Some(first), Some(second)) => {
            return Err(bootstrap_error(
                second.line,
                format!("second running task {} (task {} already running)", second.id, first.id),
            ))
        }
    }

    let mut registry = TaskRegistry::with_default_task(default_task);
    for record in &records {
        debug!("Bootstrap line {}: {:?}", record.line, record);
        registry.load_initial(record.id, record.priority, record.state, record.wait_key)?;
    }

    info!(
        "Loaded {} task(s): {} ready, {} waiting",
        registry.len(),
        registry.ready().len(),
        registry.waiting().len()
    );
    Ok(registry)
}

pub async fn load_file(path: impl AsRef<Path>, default_task: TaskId) -> Result<TaskRegistry> {
    let path = path.as_ref();
    info!("Loading initial tasks from {}", path.display());
    let text = tokio::fs::read_to_string(path).await?;
    load_registry(&text, default_task)
}
