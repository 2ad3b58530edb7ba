//! Preemption decision.
//!
//! The ready queue is kept sorted, so its head is always the best ready
//! candidate and a single comparison against the running task decides
//! whether to swap.

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

/// Outcome of a swap between the running task and the ready head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preemption {
    pub demoted: TaskId,
    pub promoted: TaskId,
}

/// True only when both slots are occupied and the candidate has a
/// strictly lower priority value than the running task.
pub fn should_preempt(running: Option<&Task>, ready_head: Option<&Task>) -> bool {
    match (running, ready_head) {
        (Some(running), Some(candidate)) => candidate.priority < running.priority,
        _ => false,
    }
}
