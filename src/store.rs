//! Remote task store.
//!
//! The store is the single source of truth for task records. [`TaskStore`] is
//! the seam the collection manager talks through; [`HttpTaskStore`] speaks
//! the REST resource:
//!
//! | Method | Path          | Body        | Response        |
//! |--------|---------------|-------------|-----------------|
//! | GET    | `/api/tasks`      | -           | `[Task]`        |
//! | POST   | `/api/tasks`      | TaskPayload | `Task`          |
//! | PUT    | `/api/tasks/{id}` | TaskPayload | `Task`          |
//! | DELETE | `/api/tasks/{id}` | -           | status only     |

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ConfigError, TransportError};
use crate::models::{Task, TaskPayload};

/// Longest slice of an error body kept in a [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// Remote store interface for task CRUD operations.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetch every task.
    async fn list_tasks(&self) -> Result<Vec<Task>, TransportError>;

    /// Create a task and return it with its assigned id.
    async fn create_task(&self, payload: &TaskPayload) -> Result<Task, TransportError>;

    /// Replace every field of task `id`.
    async fn update_task(&self, id: u64, payload: &TaskPayload) -> Result<Task, TransportError>;

    /// Remove task `id`.
    async fn delete_task(&self, id: u64) -> Result<(), TransportError>;
}

/// [`TaskStore`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: Client,
    collection_url: Url,
}

impl HttpTaskStore {
    /// Builds a store for the resource configured in `config`.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let collection_url = config.resource_url()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ConfigError::Client)?;
        Ok(HttpTaskStore {
            client,
            collection_url,
        })
    }

    /// URL of the task collection.
    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}/{}", self.collection_url.as_str().trim_end_matches('/'), id)
    }

    /// Maps a non-2xx response to a [`TransportError`].
    ///
    /// `id` is the task the request targeted; a 404 on it becomes `NotFound`.
    async fn check(response: Response, id: Option<u64>) -> Result<Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(TransportError::NotFound { id });
            }
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        } else {
            body.trim().chars().take(MAX_ERROR_BODY).collect()
        };
        warn!("Remote store rejected request: {} {}", status.as_u16(), message);
        Err(TransportError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, TransportError> {
        debug!("GET {}", self.collection_url);
        let response = self.client.get(self.collection_url.clone()).send().await?;
        let response = Self::check(response, None).await?;
        Self::decode(response).await
    }

    async fn create_task(&self, payload: &TaskPayload) -> Result<Task, TransportError> {
        debug!("POST {}", self.collection_url);
        let response = self
            .client
            .post(self.collection_url.clone())
            .json(payload)
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        Self::decode(response).await
    }

    async fn update_task(&self, id: u64, payload: &TaskPayload) -> Result<Task, TransportError> {
        let url = self.item_url(id);
        debug!("PUT {}", url);
        let response = self.client.put(&url).json(payload).send().await?;
        let response = Self::check(response, Some(id)).await?;
        Self::decode(response).await
    }

    async fn delete_task(&self, id: u64) -> Result<(), TransportError> {
        let url = self.item_url(id);
        debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }
}
