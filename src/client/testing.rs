use std::cell::RefCell;

use chrono::{TimeZone, Utc};

use super::api::{ClientError, TaskApi};
use crate::filters::TaskFilter;
use crate::models::{Assignee, NewTask, Task, TaskId, TaskPatch, TaskPriority, TaskStatus, TaskWithAssignee};

pub fn task(id: TaskId, status: TaskStatus) -> TaskWithAssignee {
    let created = Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap();
    TaskWithAssignee {
        task: Task {
            id,
            title: format!("Task {id}"),
            description: None,
            status,
            priority: TaskPriority::Medium,
            user_id: 1,
            deadline: None,
            created_at: created,
            updated_at: created,
        },
        assignee: Some(Assignee {
            id: 1,
            name: "Default User".into(),
            email: "user@example.com".into(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Get(TaskId),
    Create(String),
    Update(TaskId, TaskPatch),
    Delete(TaskId),
}

/// In-memory `TaskApi` that records calls and can be told to fail.
#[derive(Default)]
pub struct FakeApi {
    pub tasks: RefCell<Vec<TaskWithAssignee>>,
    pub calls: RefCell<Vec<Call>>,
    pub fail: RefCell<bool>,
}

impl FakeApi {
    pub fn with_tasks(tasks: Vec<TaskWithAssignee>) -> Self {
        FakeApi {
            tasks: RefCell::new(tasks),
            ..FakeApi::default()
        }
    }

    pub fn failing(self) -> Self {
        *self.fail.borrow_mut() = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn check(&self) -> Result<(), ClientError> {
        if *self.fail.borrow() {
            return Err(ClientError::Status {
                status: 500,
                message: "Internal server error".into(),
            });
        }
        Ok(())
    }

    fn not_found() -> ClientError {
        ClientError::Status {
            status: 404,
            message: "Task not found".into(),
        }
    }
}

impl TaskApi for FakeApi {
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<TaskWithAssignee>, ClientError> {
        self.calls.borrow_mut().push(Call::List);
        self.check()?;
        Ok(self
            .tasks
            .borrow()
            .iter()
            .filter(|t| filter.matches(&t.task))
            .cloned()
            .collect())
    }

    async fn get(&self, id: TaskId) -> Result<TaskWithAssignee, ClientError> {
        self.calls.borrow_mut().push(Call::Get(id));
        self.check()?;
        self.tasks
            .borrow()
            .iter()
            .find(|t| t.task.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create(&self, input: &NewTask) -> Result<TaskWithAssignee, ClientError> {
        self.calls.borrow_mut().push(Call::Create(input.title.clone()));
        self.check()?;
        let mut tasks = self.tasks.borrow_mut();
        let id = tasks.iter().map(|t| t.task.id).max().unwrap_or(0) + 1;
        let mut created = task(id, input.status);
        created.task.title = input.title.clone();
        created.task.priority = input.priority;
        tasks.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<TaskWithAssignee, ClientError> {
        self.calls.borrow_mut().push(Call::Update(id, patch.clone()));
        self.check()?;
        let mut tasks = self.tasks.borrow_mut();
        let entry = tasks
            .iter_mut()
            .find(|t| t.task.id == id)
            .ok_or_else(Self::not_found)?;
        patch.apply_to(&mut entry.task);
        Ok(entry.clone())
    }

    async fn delete(&self, id: TaskId) -> Result<(), ClientError> {
        self.calls.borrow_mut().push(Call::Delete(id));
        self.check()?;
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.task.id != id);
        if tasks.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}
