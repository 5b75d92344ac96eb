use log::debug;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::dates;
use crate::error::AppError;
use crate::filters::TaskFilter;
use crate::models::task::TaskAssigneeRow;
use crate::models::{NewTask, Task, TaskId, TaskPatch, TaskWithAssignee};

const SELECT_WITH_ASSIGNEE: &str = "
    SELECT t.id, t.title, t.description, t.status, t.priority, t.user_id,
           t.deadline, t.created_at, t.updated_at,
           u.name AS assignee_name, u.email AS assignee_email
    FROM tasks t
    JOIN users u ON u.id = t.user_id";

const SELECT_TASK: &str = "
    SELECT id, title, description, status, priority, user_id,
           deadline, created_at, updated_at
    FROM tasks
    WHERE id = ?";

async fn find_with_assignee(
    pool: &SqlitePool,
    id: TaskId,
) -> Result<Option<TaskWithAssignee>, sqlx::Error> {
    let row = sqlx::query_as::<_, TaskAssigneeRow>(&format!("{SELECT_WITH_ASSIGNEE} WHERE t.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(TaskWithAssignee::from))
}

/// All tasks matching `filter`, in insertion order.
pub async fn list_tasks(
    pool: &SqlitePool,
    filter: &TaskFilter,
) -> Result<Vec<TaskWithAssignee>, AppError> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_WITH_ASSIGNEE);
    filter.push_where(&mut query, "t");
    query.push(" ORDER BY t.id");

    let rows = query
        .build_query_as::<TaskAssigneeRow>()
        .fetch_all(pool)
        .await?;

    debug!("Listed {} tasks with filter {:?}", rows.len(), filter);
    Ok(rows.into_iter().map(TaskWithAssignee::from).collect())
}

pub async fn get_task(pool: &SqlitePool, id: TaskId) -> Result<TaskWithAssignee, AppError> {
    find_with_assignee(pool, id)
        .await?
        .ok_or_else(AppError::task_not_found)
}

pub async fn create_task(pool: &SqlitePool, input: NewTask) -> Result<TaskWithAssignee, AppError> {
    if input.title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }

    let now = dates::now();
    let result = sqlx::query(
        "INSERT INTO tasks (title, description, status, priority, user_id, deadline, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.status)
    .bind(input.priority)
    .bind(input.user_id)
    .bind(input.deadline)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(AppError::from_write)?;

    let id = result.last_insert_rowid();
    debug!("Inserted task {} for user {}", id, input.user_id);

    find_with_assignee(pool, id)
        .await?
        .ok_or_else(AppError::task_not_found)
}

/// Applies the fields present in `patch`. A patch that changes nothing
/// leaves the row, including `updated_at`, untouched.
pub async fn update_task(
    pool: &SqlitePool,
    id: TaskId,
    patch: &TaskPatch,
) -> Result<TaskWithAssignee, AppError> {
    if matches!(&patch.title, Some(title) if title.is_empty()) {
        return Err(AppError::Validation("Title must not be empty".into()));
    }

    let mut task = sqlx::query_as::<_, Task>(SELECT_TASK)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(AppError::task_not_found)?;

    if patch.apply_to(&mut task) {
        task.updated_at = dates::now();

        sqlx::query(
            "UPDATE tasks
             SET title = ?, description = ?, status = ?, priority = ?,
                 user_id = ?, deadline = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.user_id)
        .bind(task.deadline)
        .bind(task.updated_at)
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::from_write)?;

        debug!("Updated task {}", id);
    }

    get_task(pool, id).await
}

/// Hard delete.
pub async fn delete_task(pool: &SqlitePool, id: TaskId) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::task_not_found());
    }
    Ok(())
}
