mod policy;
mod queue;
mod registry;
mod task;

pub use policy::{should_preempt, Preemption};
pub use queue::TaskQueue;
pub use registry::{Snapshot, Suspension, TaskRegistry, DEFAULT_TASK_ID};
pub use task::{Priority, Task, TaskId, TaskState, WaitKey};

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Duplicate id: {0}")]
    DuplicateId(TaskId),

    #[error("Task with id {0} not found in the ready queue")]
    NotFound(TaskId),

    #[error("Task {0} is protected: cannot delete or move the running or default task")]
    ProtectedTask(TaskId),

    #[error("No task is currently in running state")]
    NoRunningTask,

    #[error("No tasks in the ready queue")]
    EmptyReady,

    #[error("Running slot already holds task {running}, cannot load task {rejected}")]
    RunningOccupied { running: TaskId, rejected: TaskId },

    #[error("Invalid initial state: {0:?}")]
    InvalidInitialState(TaskState),
}
