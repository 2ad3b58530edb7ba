use std::collections::VecDeque;

use crate::task::{Task, TaskId};

/// Ordered sequence of task records.
///
/// The queue itself enforces no ordering; the ready queue stays sorted
/// because it is only ever filled through [`TaskQueue::insert_by_priority`].
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    tasks: VecDeque<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Appends at the tail, keeping arrival order.
    pub fn push_back(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    /// Inserts after every task whose priority is lower or equal, so equal
    /// priorities keep their arrival order.
    pub fn insert_by_priority(&mut self, task: Task) {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.priority > task.priority)
            .unwrap_or(self.tasks.len());
        self.tasks.insert(pos, task);
    }

    /// Unlinks the first task with this id. Absent ids are not an error:
    /// callers probe several queues in turn.
    pub fn remove_by_id(&mut self, id: TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        self.tasks.remove(pos)
    }

    /// Removes every matching task in one pass. Both the removed tasks and
    /// the ones left behind keep their relative order.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<Task>
    where
        F: FnMut(&Task) -> bool,
    {
        let (removed, kept): (VecDeque<Task>, VecDeque<Task>) =
            self.tasks.drain(..).partition(|t| predicate(t));
        self.tasks = kept;
        removed.into()
    }

    pub fn find_by_id(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.find_by_id(id).is_some()
    }

    pub fn front(&self) -> Option<&Task> {
        self.tasks.front()
    }

    pub fn pop_front(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id).collect()
    }
}
