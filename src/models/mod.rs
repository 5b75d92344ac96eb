// src/models/mod.rs

pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskId, TaskPatch, TaskPriority, TaskStatus, TaskWithAssignee};
pub use user::{Assignee, User};
