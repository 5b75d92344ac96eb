use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use thiserror::Error;

use crate::error::ErrorResponse;
use crate::filters::TaskFilter;
use crate::models::{NewTask, TaskId, TaskPatch, TaskWithAssignee};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }
}

/// Server operations the client state depends on.
#[allow(async_fn_in_trait)]
pub trait TaskApi {
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<TaskWithAssignee>, ClientError>;
    async fn get(&self, id: TaskId) -> Result<TaskWithAssignee, ClientError>;
    async fn create(&self, input: &NewTask) -> Result<TaskWithAssignee, ClientError>;
    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<TaskWithAssignee, ClientError>;
    async fn delete(&self, id: TaskId) -> Result<(), ClientError>;
}

/// `TaskApi` over HTTP against the `/tasks` routes.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpTaskApi { client, base_url }
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{}", self.base_url, id)
    }

    async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        debug!("Request failed with {}: {}", status, message);
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Query pairs for the list endpoint; absent constraints are omitted.
pub fn filter_query(filter: &TaskFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(status) = filter.status {
        query.push(("status", status.as_str().to_string()));
    }
    if let Some(priority) = filter.priority {
        query.push(("priority", priority.as_str().to_string()));
    }
    if let Some(since) = filter.created_since {
        query.push(("createdAt", since.to_rfc3339()));
    }
    query
}

impl TaskApi for HttpTaskApi {
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<TaskWithAssignee>, ClientError> {
        let request = self.client.get(self.tasks_url()).query(&filter_query(filter));
        Ok(Self::send(request).await?.json().await?)
    }

    async fn get(&self, id: TaskId) -> Result<TaskWithAssignee, ClientError> {
        let request = self.client.get(self.task_url(id));
        Ok(Self::send(request).await?.json().await?)
    }

    async fn create(&self, input: &NewTask) -> Result<TaskWithAssignee, ClientError> {
        let request = self.client.post(self.tasks_url()).json(input);
        Ok(Self::send(request).await?.json().await?)
    }

    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<TaskWithAssignee, ClientError> {
        let request = self.client.put(self.task_url(id)).json(patch);
        Ok(Self::send(request).await?.json().await?)
    }

    async fn delete(&self, id: TaskId) -> Result<(), ClientError> {
        Self::send(self.client.delete(self.task_url(id))).await?;
        Ok(())
    }
}
