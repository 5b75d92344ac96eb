//! Task list filtering.
//!
//! Constraints are independent and AND-combined; an absent constraint places
//! no restriction on its field.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};

use crate::dates::parse_datetime;
use crate::error::AppError;
use crate::models::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Inclusive lower bound on `created_at`.
    pub created_since: Option<DateTime<Utc>>,
}

impl TaskFilter {
    /// Builds a filter from already-validated enum values and the raw
    /// `createdAt` string, which is parsed here. A blank `createdAt` is the
    /// same as none.
    pub fn new(
        status: Option<TaskStatus>,
        priority: Option<TaskPriority>,
        created_at: Option<&str>,
    ) -> Result<Self, AppError> {
        let created_since = match created_at.filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => Some(parse_datetime(raw).ok_or_else(|| {
                AppError::Validation(format!("Invalid createdAt date: {raw:?}"))
            })?),
            None => None,
        };

        Ok(TaskFilter {
            status,
            priority,
            created_since,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.created_since.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
            && self
                .created_since
                .map_or(true, |since| task.created_at >= since)
    }

    /// Appends a `WHERE` clause for the present constraints; appends nothing
    /// when the filter is empty. Column names are qualified with `alias`.
    pub fn push_where(&self, query: &mut QueryBuilder<'_, Sqlite>, alias: &str) {
        if self.is_empty() {
            return;
        }

        query.push(" WHERE ");
        let mut conditions = query.separated(" AND ");

        if let Some(status) = self.status {
            conditions.push(format!("{alias}.status = "));
            conditions.push_bind_unseparated(status);
        }
        if let Some(priority) = self.priority {
            conditions.push(format!("{alias}.priority = "));
            conditions.push_bind_unseparated(priority);
        }
        if let Some(since) = self.created_since {
            conditions.push(format!("{alias}.created_at >= "));
            conditions.push_bind_unseparated(since);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: i64, status: TaskStatus, priority: TaskPriority, day: u32) -> Task {
        let created = Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap();
        Task {
            id,
            title: format!("task {id}"),
            description: None,
            status,
            priority,
            user_id: 1,
            deadline: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, TaskStatus::Todo, TaskPriority::High, 1),
            task(2, TaskStatus::Todo, TaskPriority::Low, 2),
            task(3, TaskStatus::Done, TaskPriority::High, 3),
            task(4, TaskStatus::Review, TaskPriority::Medium, 4),
        ]
    }

    fn ids(filter: &TaskFilter) -> Vec<i64> {
        sample()
            .iter()
            .filter(|t| filter.matches(t))
            .map(|t| t.id)
            .collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TaskFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter), vec![1, 2, 3, 4]);
    }

    #[test]
    fn status_and_priority_intersect() {
        let filter = TaskFilter::new(Some(TaskStatus::Todo), Some(TaskPriority::High), None).unwrap();
        assert_eq!(ids(&filter), vec![1]);
    }

    #[test]
    fn created_at_is_an_inclusive_lower_bound() {
        let filter = TaskFilter::new(None, None, Some("2024-06-03")).unwrap();
        assert_eq!(ids(&filter), vec![3, 4]);

        let exact = TaskFilter::new(None, None, Some("2024-06-03T12:00:00Z")).unwrap();
        assert_eq!(ids(&exact), vec![3, 4]);

        let after = TaskFilter::new(None, None, Some("2024-06-03T12:00:01Z")).unwrap();
        assert_eq!(ids(&after), vec![4]);
    }

    #[test]
    fn unparseable_created_at_is_a_validation_error() {
        let err = TaskFilter::new(None, None, Some("last tuesday")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = TaskFilter::new(None, None, Some("+10000-01-01")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn blank_created_at_places_no_constraint() {
        for raw in ["", "   "] {
            let filter = TaskFilter::new(None, None, Some(raw)).unwrap();
            assert!(filter.is_empty(), "{raw:?}");
            assert_eq!(ids(&filter), vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn where_clause_lists_only_present_constraints() {
        let filter = TaskFilter::new(Some(TaskStatus::Done), None, Some("2024-06-01")).unwrap();
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM tasks t");
        filter.push_where(&mut query, "t");

        assert_eq!(
            query.sql(),
            "SELECT * FROM tasks t WHERE t.status = ? AND t.created_at >= ?"
        );
    }

    #[test]
    fn empty_filter_adds_no_where_clause() {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM tasks t");
        TaskFilter::default().push_where(&mut query, "t");
        assert_eq!(query.sql(), "SELECT * FROM tasks t");
    }
}
