//! Board state and drag-and-drop reconciliation.
//!
//! A drag goes `idle → dragging → (dropped | cancelled)`. On drop the target
//! is resolved into at most one [`BoardAction`]: a status move, which goes to
//! the server optimistically, or a same-column reorder, which stays local.

use log::{info, warn};

use super::api::{ClientError, TaskApi};
use super::cache::{CacheSnapshot, TaskCache};
use crate::filters::TaskFilter;
use crate::models::{NewTask, TaskId, TaskPatch, TaskStatus, TaskWithAssignee};

/// What the pointer was over when the drag ended. Either part may be absent;
/// when both are present the task wins and the column is only a fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropTarget {
    pub task: Option<TaskId>,
    pub column: Option<TaskStatus>,
}

impl DropTarget {
    pub fn column(status: TaskStatus) -> Self {
        DropTarget {
            task: None,
            column: Some(status),
        }
    }

    pub fn task(id: TaskId) -> Self {
        DropTarget {
            task: Some(id),
            column: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    None,
    /// Change status on the server; applied optimistically.
    Move { task_id: TaskId, status: TaskStatus },
    /// Put `task_id` where `target_id` is; client-only.
    Reorder { task_id: TaskId, target_id: TaskId },
}

/// Decides what a drop of `task_id` onto `target` means for the current cache.
pub fn resolve_drop(cache: &TaskCache, task_id: TaskId, target: Option<DropTarget>) -> BoardAction {
    let Some(target) = target else {
        return BoardAction::None;
    };
    let Some(dragged) = cache.get(task_id) else {
        return BoardAction::None;
    };
    let current = dragged.task.status;

    if let Some(over) = target.task.and_then(|id| cache.get(id)) {
        let over_status = over.task.status;
        if over_status != current {
            return BoardAction::Move {
                task_id,
                status: over_status,
            };
        }
        if over.task.id == task_id {
            return BoardAction::None;
        }
        return BoardAction::Reorder {
            task_id,
            target_id: over.task.id,
        };
    }

    match target.column {
        Some(status) if status != current => BoardAction::Move { task_id, status },
        _ => BoardAction::None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        task_id: TaskId,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn active_task(&self) -> Option<TaskId> {
        match self.state {
            DragState::Dragging { task_id } => Some(task_id),
            DragState::Idle => None,
        }
    }

    /// Begins dragging; a stale id leaves the session idle.
    pub fn start(&mut self, task_id: TaskId, cache: &TaskCache) -> bool {
        self.state = match cache.get(task_id) {
            Some(_) => DragState::Dragging { task_id },
            None => DragState::Idle,
        };
        self.active_task().is_some()
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Ends the drag and returns the resulting action.
    pub fn drop_on(&mut self, target: Option<DropTarget>, cache: &TaskCache) -> BoardAction {
        let state = std::mem::take(&mut self.state);
        match state {
            DragState::Dragging { task_id } => resolve_drop(cache, task_id, target),
            DragState::Idle => BoardAction::None,
        }
    }
}

/// A status move that has been applied locally but not yet confirmed.
#[derive(Debug)]
pub struct PendingMove {
    pub task_id: TaskId,
    pub status: TaskStatus,
    snapshot: CacheSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Cached tasks plus the interaction state around them.
pub struct TaskBoard<A> {
    api: A,
    cache: TaskCache,
    load_state: LoadState,
    error: Option<String>,
    drag: DragSession,
}

impl<A: TaskApi> TaskBoard<A> {
    pub fn new(api: A) -> Self {
        TaskBoard {
            api,
            cache: TaskCache::default(),
            load_state: LoadState::Loading,
            error: None,
            drag: DragSession::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Last mutation failure, if the user has not dismissed it.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    /// Columns in board order with their tasks.
    pub fn columns(&self) -> Vec<(TaskStatus, Vec<&TaskWithAssignee>)> {
        TaskStatus::ALL
            .into_iter()
            .map(|status| (status, self.cache.by_status(status).collect()))
            .collect()
    }

    /// Fetches every task and replaces the cache. Also serves as retry after
    /// a failed load.
    pub async fn refetch(&mut self) {
        self.load_state = LoadState::Loading;
        match self.api.list(&TaskFilter::default()).await {
            Ok(tasks) => {
                info!("Loaded {} tasks", tasks.len());
                self.cache.replace_all(tasks);
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                warn!("Failed to load tasks: {}", e);
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
    }

    pub fn drag_start(&mut self, task_id: TaskId) -> bool {
        self.drag.start(task_id, &self.cache)
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }

    /// Ends the current drag and carries out whatever it resolves to. A move
    /// the server rejects comes back as `Err` after the cache is rolled back.
    pub async fn drop_on(&mut self, target: Option<DropTarget>) -> Result<BoardAction, ClientError> {
        let action = self.drag.drop_on(target, &self.cache);
        match action {
            BoardAction::Move { task_id, status } => self.move_task(task_id, status).await?,
            BoardAction::Reorder { task_id, target_id } => {
                self.cache.reorder(task_id, target_id);
            }
            BoardAction::None => {}
        }
        Ok(action)
    }

    /// Applies a status change locally, keeping a snapshot to roll back to.
    /// Returns `None` when the task is unknown or already has `status`.
    pub fn begin_move(&mut self, task_id: TaskId, status: TaskStatus) -> Option<PendingMove> {
        let current = self.cache.get(task_id)?.task.status;
        if current == status {
            return None;
        }

        let snapshot = self.cache.snapshot();
        self.cache.set_status(task_id, status);
        Some(PendingMove {
            task_id,
            status,
            snapshot,
        })
    }

    /// Settles a pending move with the server's answer. On failure the whole
    /// cache goes back to the snapshot.
    pub fn finish_move(
        &mut self,
        pending: PendingMove,
        result: Result<TaskWithAssignee, ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Failed to move task {} to {}: {}", pending.task_id, pending.status, e);
                self.cache.restore(pending.snapshot);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Optimistic status change: cache first, then the server.
    pub async fn move_task(&mut self, task_id: TaskId, status: TaskStatus) -> Result<(), ClientError> {
        let Some(pending) = self.begin_move(task_id, status) else {
            return Ok(());
        };
        let result = self.api.update(task_id, &TaskPatch::status(status)).await;
        self.finish_move(pending, result)
    }

    pub fn reorder(&mut self, task_id: TaskId, target_id: TaskId) -> bool {
        self.cache.reorder(task_id, target_id)
    }

    pub async fn create_task(&mut self, input: &NewTask) -> Result<TaskWithAssignee, ClientError> {
        let created = self.api.create(input).await.inspect_err(|e| {
            self.error = Some(e.to_string());
        })?;
        self.refetch().await;
        Ok(created)
    }

    pub async fn delete_task(&mut self, task_id: TaskId) -> Result<(), ClientError> {
        self.api.delete(task_id).await.inspect_err(|e| {
            self.error = Some(e.to_string());
        })?;
        self.refetch().await;
        Ok(())
    }
}
