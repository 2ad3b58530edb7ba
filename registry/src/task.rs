use serde::{Deserialize, Serialize};
use std::fmt;

pub type TaskId = i64;
pub type Priority = i64;
pub type WaitKey = i64;

/// Logical scheduling state of a task record.
///
/// `Woken` only exists while a wake-up is being processed; every woken
/// record is replaced by a fresh `Ready` record before `wake` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    Running,
    Ready,
    Waiting,
    Woken,
}

impl TaskState {
    /// Decodes the numeric state used by the bootstrap format
    /// (0 = Running, 1 = Ready, 2 = Waiting).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TaskState::Running),
            1 => Some(TaskState::Ready),
            2 => Some(TaskState::Waiting),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            TaskState::Running => 0,
            TaskState::Ready => 1,
            TaskState::Waiting => 2,
            TaskState::Woken => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskState::Running => "Running",
            TaskState::Ready => "Ready",
            TaskState::Waiting | TaskState::Woken => "Wait",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A schedulable record. Carries no payload; identity is the `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Lower value runs first.
    pub priority: Priority,
    pub state: TaskState,
    /// Only set while the task is waiting.
    pub wait_key: Option<WaitKey>,
}

impl Task {
    pub fn running(id: TaskId, priority: Priority) -> Self {
        Self {
            id,
            priority,
            state: TaskState::Running,
            wait_key: None,
        }
    }

    pub fn ready(id: TaskId, priority: Priority) -> Self {
        Self {
            id,
            priority,
            state: TaskState::Ready,
            wait_key: None,
        }
    }

    pub fn waiting(id: TaskId, priority: Priority, wait_key: WaitKey) -> Self {
        Self {
            id,
            priority,
            state: TaskState::Waiting,
            wait_key: Some(wait_key),
        }
    }

    /// Marks a task just released from the waiting queue.
    pub fn into_woken(self) -> Self {
        Self {
            state: TaskState::Woken,
            wait_key: None,
            ..self
        }
    }

    /// Fresh ready record carrying the same id and priority.
    pub fn into_ready(self) -> Self {
        Task::ready(self.id, self.priority)
    }

    pub fn is_waiting_on(&self, key: WaitKey) -> bool {
        self.state == TaskState::Waiting && self.wait_key == Some(key)
    }
}
