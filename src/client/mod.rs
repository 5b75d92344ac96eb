//! Client-side task state: the cached task list, drag-and-drop
//! reconciliation, view filtering and deadline progress.

pub mod api;
pub mod board;
pub mod cache;
pub mod progress;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ClientError, HttpTaskApi, TaskApi};
pub use board::{BoardAction, DragSession, DropTarget, LoadState, TaskBoard};
pub use cache::TaskCache;
