//! Request validation for the task routes.
//!
//! Every rule is checked and all violations are reported together in one
//! message. Nothing here touches storage.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::task_models::{TaskQueryParams, TaskRequestBody};
use crate::dates::parse_datetime;
use crate::error::AppError;
use crate::filters::TaskFilter;
use crate::models::{NewTask, TaskId, TaskPatch, TaskPriority, TaskStatus};

pub fn parse_task_id(raw: &str) -> Result<TaskId, AppError> {
    raw.trim()
        .parse::<TaskId>()
        .map_err(|_| AppError::Validation(format!("Invalid task ID: {raw:?}")))
}

pub fn validate_query(params: &TaskQueryParams) -> Result<TaskFilter, AppError> {
    let mut violations = Vec::new();

    let status = check_enum::<TaskStatus>(
        "status",
        params.status.as_deref(),
        &TaskStatus::ALL.map(TaskStatus::as_str),
        &mut violations,
    );
    let priority = check_enum::<TaskPriority>(
        "priority",
        params.priority.as_deref(),
        &TaskPriority::ALL.map(TaskPriority::as_str),
        &mut violations,
    );

    if !violations.is_empty() {
        return Err(AppError::Validation(format!(
            "Invalid query parameters: {}",
            violations.join(", ")
        )));
    }

    TaskFilter::new(status, priority, params.created_at.as_deref())
}

pub fn validate_create(body: &TaskRequestBody) -> Result<NewTask, AppError> {
    let mut violations = Vec::new();

    match body.title.as_ref().map(Option::as_deref) {
        None | Some(None | Some("")) => violations.push("Title is required".to_string()),
        Some(Some(_)) => {}
    }

    let fields = check_common(body, &mut violations);

    let user_id = match (&body.user_id, fields.user_id) {
        (None | Some(Value::Null), _) => {
            violations.push("userId is required".to_string());
            None
        }
        (_, parsed) => parsed,
    };

    finish(violations)?;

    Ok(NewTask {
        title: body.title.clone().flatten().unwrap_or_default(),
        description: body.description.clone(),
        status: fields.status.unwrap_or_default(),
        priority: fields.priority.unwrap_or_default(),
        user_id: user_id.unwrap_or_default(),
        deadline: fields.deadline.flatten(),
    })
}

pub fn validate_update(body: &TaskRequestBody) -> Result<TaskPatch, AppError> {
    let mut violations = Vec::new();

    match body.title.as_ref().map(Option::as_deref) {
        Some(None) => violations.push("Title must not be null".to_string()),
        Some(Some("")) => violations.push("Title must not be empty".to_string()),
        _ => {}
    }

    let fields = check_common(body, &mut violations);
    finish(violations)?;

    Ok(TaskPatch {
        title: body.title.clone().flatten(),
        description: body.description.clone(),
        status: fields.status,
        priority: fields.priority,
        user_id: fields.user_id,
        deadline: fields.deadline,
    })
}

/// Fields validated the same way for create and update.
struct CommonFields {
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    user_id: Option<i64>,
    /// `Some(None)` means "clear".
    deadline: Option<Option<DateTime<Utc>>>,
}

fn check_common(body: &TaskRequestBody, violations: &mut Vec<String>) -> CommonFields {
    let raw_status = non_null("status", &body.status, violations);
    let status = check_enum::<TaskStatus>(
        "status",
        raw_status,
        &TaskStatus::ALL.map(TaskStatus::as_str),
        violations,
    );
    let raw_priority = non_null("priority", &body.priority, violations);
    let priority = check_enum::<TaskPriority>(
        "priority",
        raw_priority,
        &TaskPriority::ALL.map(TaskPriority::as_str),
        violations,
    );

    let user_id = match &body.user_id {
        None | Some(Value::Null) => None,
        Some(value) => match user_id_from(value) {
            Some(id) => Some(id),
            None => {
                violations.push("userId must be a numeric identifier".to_string());
                None
            }
        },
    };

    let deadline = match &body.deadline {
        None => None,
        Some(None) => Some(None),
        Some(Some(raw)) if raw.trim().is_empty() => Some(None),
        Some(Some(raw)) => match parse_datetime(raw) {
            Some(parsed) => Some(Some(parsed)),
            None => {
                violations.push(format!("deadline must be a valid date, got {raw:?}"));
                None
            }
        },
    };

    CommonFields {
        status,
        priority,
        user_id,
        deadline,
    }
}

/// Optional fields may be left out but not sent as `null`.
fn non_null<'a>(
    field: &str,
    value: &'a Option<Option<String>>,
    violations: &mut Vec<String>,
) -> Option<&'a str> {
    match value {
        Some(None) => {
            violations.push(format!("{field} must not be null"));
            None
        }
        Some(Some(raw)) => Some(raw.as_str()),
        None => None,
    }
}

fn check_enum<T: FromStr>(
    field: &str,
    raw: Option<&str>,
    allowed: &[&str],
    violations: &mut Vec<String>,
) -> Option<T> {
    let raw = raw?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            violations.push(format!(
                "Invalid {field} {raw:?}, expected one of {}",
                allowed.join(", ")
            ));
            None
        }
    }
}

fn user_id_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn finish(violations: Vec<String>) -> Result<(), AppError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations.join(", ")))
    }
}
