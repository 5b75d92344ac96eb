use crate::models::{TaskId, TaskStatus, TaskWithAssignee};

/// The task list as the UI holds it, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCache {
    tasks: Vec<TaskWithAssignee>,
}

/// A full copy of the cache taken before a speculative change.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot(Vec<TaskWithAssignee>);

impl TaskCache {
    pub fn new(tasks: Vec<TaskWithAssignee>) -> Self {
        TaskCache { tasks }
    }

    pub fn tasks(&self) -> &[TaskWithAssignee] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&TaskWithAssignee> {
        self.tasks.iter().find(|t| t.task.id == id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.task.id == id)
    }

    /// Tasks in one column, in cache order.
    pub fn by_status(&self, status: TaskStatus) -> impl Iterator<Item = &TaskWithAssignee> {
        self.tasks.iter().filter(move |t| t.task.status == status)
    }

    /// Replaces everything, discarding any local ordering.
    pub fn replace_all(&mut self, tasks: Vec<TaskWithAssignee>) {
        self.tasks = tasks;
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot(self.tasks.clone())
    }

    pub fn restore(&mut self, snapshot: CacheSnapshot) {
        self.tasks = snapshot.0;
    }

    /// Changes one task's status in place. Returns false if the id is unknown.
    pub fn set_status(&mut self, id: TaskId, status: TaskStatus) -> bool {
        match self.tasks.iter_mut().find(|t| t.task.id == id) {
            Some(entry) => {
                entry.task.status = status;
                true
            }
            None => false,
        }
    }

    /// Moves `id` into the slot currently held by `target`, shifting the
    /// tasks in between. Local only; returns false when nothing moved.
    pub fn reorder(&mut self, id: TaskId, target: TaskId) -> bool {
        let (Some(from), Some(to)) = (self.position(id), self.position(target)) else {
            return false;
        };
        if from == to {
            return false;
        }

        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        true
    }
}
