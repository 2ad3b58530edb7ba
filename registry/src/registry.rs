use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::policy::{should_preempt, Preemption};
use crate::queue::TaskQueue;
use crate::task::{Priority, Task, TaskId, TaskState, WaitKey};
use crate::{RegistryError, Result};

/// Id of the idle task that can never be deleted, suspended or parked.
pub const DEFAULT_TASK_ID: TaskId = 0;

/// Result of suspending the running task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suspension {
    pub suspended: TaskId,
    /// `None` when the ready queue was empty and the running slot was left vacant.
    pub promoted: Option<TaskId>,
}

/// Serializable copy of the registry contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub running: Option<Task>,
    pub ready: Vec<Task>,
    pub waiting: Vec<Task>,
}

/// Owns every task: one optional running task, the priority-sorted ready
/// queue and the arrival-ordered waiting queue. A task id lives in exactly
/// one of the three at any time.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    running: Option<Task>,
    ready: TaskQueue,
    waiting: TaskQueue,
    default_task: TaskId,
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::with_default_task(DEFAULT_TASK_ID)
    }

    pub fn with_default_task(default_task: TaskId) -> Self {
        Self {
            running: None,
            ready: TaskQueue::new(),
            waiting: TaskQueue::new(),
            default_task,
        }
    }

    pub fn default_task_id(&self) -> TaskId {
        self.default_task
    }

    pub fn running(&self) -> Option<&Task> {
        self.running.as_ref()
    }

    pub fn ready(&self) -> &TaskQueue {
        &self.ready
    }

    pub fn waiting(&self) -> &TaskQueue {
        &self.waiting
    }

    pub fn len(&self) -> usize {
        self.running.iter().count() + self.ready.len() + self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            running: self.running.clone(),
            ready: self.ready.iter().cloned().collect(),
            waiting: self.waiting.iter().cloned().collect(),
        }
    }

    /// Checks running, then ready, then waiting.
    pub fn exists_id(&self, id: TaskId) -> bool {
        self.running.as_ref().is_some_and(|t| t.id == id)
            || self.ready.contains(id)
            || self.waiting.contains(id)
    }

    fn ensure_unique(&self, id: TaskId) -> Result<()> {
        if self.exists_id(id) {
            warn!("Rejected duplicate task id {}", id);
            return Err(RegistryError::DuplicateId(id));
        }
        Ok(())
    }

    fn is_protected(&self, id: TaskId) -> bool {
        id == self.default_task || self.running.as_ref().is_some_and(|t| t.id == id)
    }

    /// Places a task straight into the container for `state`. Only meant for
    /// the initial population; no transition rules are applied.
    pub fn load_initial(
        &mut self,
        id: TaskId,
        priority: Priority,
        state: TaskState,
        wait_key: WaitKey,
    ) -> Result<()> {
        self.ensure_unique(id)?;

        match state {
            TaskState::Running => {
                if let Some(current) = &self.running {
                    return Err(RegistryError::RunningOccupied {
                        running: current.id,
                        rejected: id,
                    });
                }
                self.running = Some(Task::running(id, priority));
            }
            TaskState::Ready => self.ready.insert_by_priority(Task::ready(id, priority)),
            TaskState::Waiting => self.waiting.push_back(Task::waiting(id, priority, wait_key)),
            TaskState::Woken => return Err(RegistryError::InvalidInitialState(state)),
        }

        debug!("Loaded task {} (priority {}) as {:?}", id, priority, state);
        Ok(())
    }

    /// New tasks always enter through the waiting queue.
    pub fn create_waiting(&mut self, id: TaskId, priority: Priority, wait_key: WaitKey) -> Result<()> {
        self.ensure_unique(id)?;
        self.waiting.push_back(Task::waiting(id, priority, wait_key));
        info!("Created task {} (priority {}) waiting on {}", id, priority, wait_key);
        Ok(())
    }

    /// Deletes from ready or waiting. Returns `Ok(false)` when the id is not
    /// present; the running task and the default task are refused.
    pub fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        if self.is_protected(id) {
            warn!("Refused to delete protected task {}", id);
            return Err(RegistryError::ProtectedTask(id));
        }

        let removed = self
            .ready
            .remove_by_id(id)
            .or_else(|| self.waiting.remove_by_id(id));

        match removed {
            Some(task) => {
                info!("Deleted task {} from {} state", id, task.state);
                Ok(true)
            }
            None => {
                debug!("Delete of unknown task {} ignored", id);
                Ok(false)
            }
        }
    }

    /// Parks the running task on `event_id` and promotes the ready head.
    pub fn suspend_running(&mut self, event_id: WaitKey) -> Result<Suspension> {
        let current = self.running.as_ref().ok_or(RegistryError::NoRunningTask)?;
        if current.id == self.default_task {
            warn!("Refused to suspend default task {}", current.id);
            return Err(RegistryError::ProtectedTask(current.id));
        }

        let Some(task) = self.running.take() else {
            return Err(RegistryError::NoRunningTask);
        };
        let suspended = task.id;
        self.waiting.push_back(Task::waiting(task.id, task.priority, event_id));
        info!("Task {} moved from running to waiting on {}", suspended, event_id);

        let promoted = self.promote_head();
        if promoted.is_none() {
            warn!("{}; running slot left empty", RegistryError::EmptyReady);
        }

        Ok(Suspension { suspended, promoted })
    }

    /// Only looks in the ready queue; a running or waiting id is `NotFound`.
    pub fn move_ready_to_waiting(&mut self, id: TaskId, event_id: WaitKey) -> Result<()> {
        if id == self.default_task {
            warn!("Refused to move default task {} to waiting", id);
            return Err(RegistryError::ProtectedTask(id));
        }

        let task = self.ready.remove_by_id(id).ok_or_else(|| {
            warn!("Task {} not found in the ready queue", id);
            RegistryError::NotFound(id)
        })?;
        self.waiting.push_back(Task::waiting(task.id, task.priority, event_id));
        info!("Task {} moved from ready to waiting on {}", id, event_id);
        Ok(())
    }

    /// Moves every task waiting on `wait_key` into the ready queue, returning
    /// the woken ids in their former waiting order.
    pub fn wake(&mut self, wait_key: WaitKey) -> Vec<TaskId> {
        let released = self.waiting.remove_where(|t| t.is_waiting_on(wait_key));
        let mut ids = Vec::with_capacity(released.len());

        for task in released {
            let woken = task.into_woken();
            ids.push(woken.id);
            self.ready.insert_by_priority(woken.into_ready());
        }

        info!("Event {} woke {} task(s): {:?}", wait_key, ids.len(), ids);
        ids
    }

    /// Swaps the running task with the ready head when the head is strictly
    /// better. Does nothing if either side is empty.
    pub fn check_preemption(&mut self) -> Option<Preemption> {
        if !should_preempt(self.running.as_ref(), self.ready.front()) {
            return None;
        }

        let demoted = self.running.take()?;
        let demoted_id = demoted.id;
        self.ready.insert_by_priority(Task::ready(demoted.id, demoted.priority));
        let promoted = self.promote_head()?;

        info!("Task {} preempted running task {}", promoted, demoted_id);
        Some(Preemption {
            demoted: demoted_id,
            promoted,
        })
    }

    /// Fills a vacant running slot from the ready head.
    pub fn dispatch_idle(&mut self) -> Option<TaskId> {
        if self.running.is_some() {
            return None;
        }
        let promoted = self.promote_head()?;
        info!("Dispatched task {} into the empty running slot", promoted);
        Some(promoted)
    }

    fn promote_head(&mut self) -> Option<TaskId> {
        let head = self.ready.pop_front()?;
        debug!("Promoting task {} (priority {}) to running", head.id, head.priority);
        self.running = Some(Task::running(head.id, head.priority));
        Some(head.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TaskRegistry {
        let mut registry = TaskRegistry::new();
        registry.load_initial(0, 5, TaskState::Running, 0).unwrap();
        registry.load_initial(1, 3, TaskState::Ready, 0).unwrap();
        registry.load_initial(2, 1, TaskState::Ready, 0).unwrap();
        registry.load_initial(3, 2, TaskState::Waiting, 7).unwrap();
        registry
    }

    #[test]
    fn test_load_initial_places_by_state() {
        let registry = sample();
        assert_eq!(registry.running().map(|t| t.id), Some(0));
        assert_eq!(registry.ready().ids(), vec![2, 1]);
        assert_eq!(registry.waiting().ids(), vec![3]);
        assert_eq!(registry.waiting().front().unwrap().wait_key, Some(7));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_load_initial_rejects_second_running() {
        let mut registry = sample();
        let err = registry.load_initial(9, 1, TaskState::Running, 0).unwrap_err();
        assert_eq!(err, RegistryError::RunningOccupied { running: 0, rejected: 9 });
        assert!(!registry.exists_id(9));
    }

    #[test]
    fn test_load_initial_rejects_woken_and_duplicates() {
        let mut registry = sample();
        assert_eq!(
            registry.load_initial(9, 1, TaskState::Woken, 0),
            Err(RegistryError::InvalidInitialState(TaskState::Woken))
        );
        assert_eq!(
            registry.load_initial(3, 1, TaskState::Ready, 0),
            Err(RegistryError::DuplicateId(3))
        );
    }

    #[test]
    fn test_exists_id_covers_every_location() {
        let registry = sample();
        for id in 0..4 {
            assert!(registry.exists_id(id), "id {} should exist", id);
        }
        assert!(!registry.exists_id(4));
    }

    #[test]
    fn test_create_waiting_appends() {
        let mut registry = sample();
        registry.create_waiting(8, 0, 7).unwrap();
        assert_eq!(registry.waiting().ids(), vec![3, 8], "new tasks are not priority ordered");
        assert_eq!(registry.create_waiting(0, 1, 1), Err(RegistryError::DuplicateId(0)));
    }

    #[test]
    fn test_delete_task() {
        let mut registry = sample();
        assert_eq!(registry.delete_task(1), Ok(true));
        assert_eq!(registry.delete_task(3), Ok(true));
        assert_eq!(registry.delete_task(1), Ok(false), "second delete is a no-op");
        assert_eq!(registry.ready().ids(), vec![2]);
        assert!(registry.waiting().is_empty());
    }

    #[test]
    fn test_suspend_default_task_is_refused() {
        let mut registry = sample();
        assert_eq!(registry.suspend_running(4), Err(RegistryError::ProtectedTask(0)));
        assert_eq!(registry.running().map(|t| t.id), Some(0));
        assert_eq!(registry.waiting().ids(), vec![3]);
    }

    #[test]
    fn test_delete_protects_running_and_default() {
        let mut registry = TaskRegistry::new();
        registry.load_initial(5, 1, TaskState::Running, 0).unwrap();
        registry.load_initial(0, 9, TaskState::Ready, 0).unwrap();

        assert_eq!(registry.delete_task(5), Err(RegistryError::ProtectedTask(5)));
        assert_eq!(registry.delete_task(0), Err(RegistryError::ProtectedTask(0)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_suspend_promotes_ready_head() {
        let mut registry = TaskRegistry::new();
        registry.load_initial(4, 2, TaskState::Running, 0).unwrap();
        registry.load_initial(0, 9, TaskState::Ready, 0).unwrap();
        registry.load_initial(6, 1, TaskState::Ready, 0).unwrap();

        let outcome = registry.suspend_running(11).unwrap();
        assert_eq!(outcome, Suspension { suspended: 4, promoted: Some(6) });
        assert_eq!(registry.running().map(|t| t.id), Some(6));
        assert_eq!(registry.running().unwrap().state, TaskState::Running);
        assert_eq!(registry.ready().ids(), vec![0]);

        let parked = registry.waiting().find_by_id(4).unwrap();
        assert_eq!(parked.wait_key, Some(11));
        assert_eq!(parked.state, TaskState::Waiting);
        assert_eq!(parked.priority, 2);
    }

    #[test]
    fn test_suspend_with_empty_ready_leaves_slot_vacant() {
        let mut registry = TaskRegistry::new();
        registry.load_initial(4, 2, TaskState::Running, 0).unwrap();

        let outcome = registry.suspend_running(1).unwrap();
        assert_eq!(outcome.promoted, None);
        assert!(registry.running().is_none());
        assert_eq!(registry.suspend_running(1), Err(RegistryError::NoRunningTask));
    }

    #[test]
    fn test_move_ready_to_waiting() {
        let mut registry = sample();
        registry.move_ready_to_waiting(1, 12).unwrap();
        assert_eq!(registry.ready().ids(), vec![2]);
        assert_eq!(registry.waiting().ids(), vec![3, 1]);
        assert_eq!(registry.waiting().find_by_id(1).unwrap().wait_key, Some(12));

        assert_eq!(registry.move_ready_to_waiting(3, 1), Err(RegistryError::NotFound(3)));

        let mut registry = TaskRegistry::new();
        registry.load_initial(5, 1, TaskState::Running, 0).unwrap();
        registry.load_initial(6, 2, TaskState::Ready, 0).unwrap();
        assert_eq!(registry.move_ready_to_waiting(5, 1), Err(RegistryError::NotFound(5)));
        assert_eq!(registry.running().map(|t| t.id), Some(5), "running task is left in place");
        assert!(registry.waiting().is_empty());
        assert_eq!(registry.move_ready_to_waiting(42, 1), Err(RegistryError::NotFound(42)));
    }

    #[test]
    fn test_move_default_task_is_refused() {
        let mut registry = TaskRegistry::new();
        registry.load_initial(5, 1, TaskState::Running, 0).unwrap();
        registry.load_initial(0, 9, TaskState::Ready, 0).unwrap();

        assert_eq!(registry.move_ready_to_waiting(0, 3), Err(RegistryError::ProtectedTask(0)));
        assert_eq!(registry.ready().ids(), vec![0]);
    }

    #[test]
    fn test_wake_resorts_into_ready() {
        let mut registry = sample();
        registry.create_waiting(10, 0, 7).unwrap();
        registry.create_waiting(11, 4, 8).unwrap();

        let woken = registry.wake(7);
        assert_eq!(woken, vec![3, 10]);
        assert_eq!(registry.ready().ids(), vec![10, 2, 3, 1]);
        assert!(registry.ready().iter().all(|t| t.state == TaskState::Ready && t.wait_key.is_none()));
        assert_eq!(registry.waiting().ids(), vec![11]);

        assert!(registry.wake(7).is_empty(), "nothing left to wake");
    }

    #[test]
    fn test_check_preemption_swaps_once() {
        let mut registry = sample();
        let swap = registry.check_preemption();
        assert_eq!(swap, Some(Preemption { demoted: 0, promoted: 2 }));
        assert_eq!(registry.running().map(|t| t.id), Some(2));
        assert_eq!(registry.ready().ids(), vec![1, 0]);

        assert_eq!(registry.check_preemption(), None);
        assert_eq!(registry.running().map(|t| t.id), Some(2));
    }

    #[test]
    fn test_check_preemption_skips_empty_running() {
        let mut registry = TaskRegistry::new();
        registry.load_initial(1, 1, TaskState::Ready, 0).unwrap();
        assert_eq!(registry.check_preemption(), None);
        assert!(registry.running().is_none());

        assert_eq!(registry.dispatch_idle(), Some(1));
        assert_eq!(registry.dispatch_idle(), None, "slot already occupied");
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = sample();
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.ready.len(), 2);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
