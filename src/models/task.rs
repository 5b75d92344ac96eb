use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::Assignee;

pub type TaskId = i64;

/// Board column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// Column order on the board.
    pub const ALL: [TaskStatus; 4] = [Self::Todo, Self::InProgress, Self::Review, Self::Done];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Review => "review",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|status| status.as_str() == s).ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|priority| priority.as_str() == s).ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub user_id: i64,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task as returned by the API: the row plus its owner's public fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskWithAssignee {
    #[serde(flatten)]
    pub task: Task,
    pub assignee: Option<Assignee>,
}

/// Row shape of `tasks JOIN users`.
#[derive(FromRow)]
pub struct TaskAssigneeRow {
    #[sqlx(flatten)]
    pub task: Task,
    pub assignee_name: String,
    pub assignee_email: String,
}

impl From<TaskAssigneeRow> for TaskWithAssignee {
    fn from(row: TaskAssigneeRow) -> Self {
        let assignee = Assignee {
            id: row.task.user_id,
            name: row.assignee_name,
            email: row.assignee_email,
        };
        TaskWithAssignee {
            task: row.task,
            assignee: Some(assignee),
        }
    }
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

/// Validated partial update. `None` leaves a field alone; for `deadline`,
/// `Some(None)` clears it (sent as `null` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Writes the present fields into `task`. Returns whether any value changed.
    pub fn apply_to(&self, task: &mut Task) -> bool {
        let mut changed = false;

        if let Some(title) = &self.title {
            changed |= replace(&mut task.title, title.clone());
        }
        if let Some(description) = &self.description {
            changed |= replace(&mut task.description, Some(description.clone()));
        }
        if let Some(status) = self.status {
            changed |= replace(&mut task.status, status);
        }
        if let Some(priority) = self.priority {
            changed |= replace(&mut task.priority, priority);
        }
        if let Some(user_id) = self.user_id {
            changed |= replace(&mut task.user_id, user_id);
        }
        if let Some(deadline) = self.deadline {
            changed |= replace(&mut task.deadline, deadline);
        }

        changed
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
