//! Todo resource calls.
//!
//! Each method binds one endpoint to a verb, path and payload and decodes the
//! envelope's payload into the matching DTO. Error handling, notification
//! and conflict pass-through all happen in `HttpClient`.

use std::sync::Arc;

use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::notify::Notifier;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateTodo, ListQuery, Todo, UpdateStatus, UpdateTodo};

pub struct TodoApi<T> {
    http: HttpClient<T>,
}

impl TodoApi<ReqwestTransport> {
    /// Client that talks to a real server over `reqwest`.
    pub fn connect(config: ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(HttpClient::new(config, transport, notifier)))
    }
}

impl<T: Transport> TodoApi<T> {
    pub fn new(http: HttpClient<T>) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient<T> {
        &self.http
    }

    /// `GET /todos?category&sort`
    pub async fn list_todos(&self, query: ListQuery) -> Result<Envelope<Vec<Todo>>, ApiError> {
        self.http.get("/todos", query.to_pairs()).await?.decode()
    }

    /// `GET /todos/{id}`
    pub async fn get_todo(&self, id: u32) -> Result<Envelope<Todo>, ApiError> {
        self.http.get(&format!("/todos/{id}"), Vec::new()).await?.decode()
    }

    /// `POST /todos`
    pub async fn create_todo(&self, input: &CreateTodo) -> Result<Envelope<Todo>, ApiError> {
        self.http.post("/todos", input).await?.decode()
    }

    /// `PUT /todos/{id}`. A stale `input.version` fails with a conflict.
    pub async fn update_todo(&self, id: u32, input: &UpdateTodo) -> Result<Envelope<Todo>, ApiError> {
        self.http.put(&format!("/todos/{id}"), input).await?.decode()
    }

    /// `PUT /todos/{id}/status`. A stale `input.version` fails with a conflict.
    pub async fn update_todo_status(
        &self,
        id: u32,
        input: &UpdateStatus,
    ) -> Result<Envelope<Todo>, ApiError> {
        self.http.put(&format!("/todos/{id}/status"), input).await?.decode()
    }

    /// `DELETE /todos/{id}`. The success envelope carries no payload.
    pub async fn delete_todo(&self, id: u32) -> Result<Envelope, ApiError> {
        self.http.delete(&format!("/todos/{id}")).await
    }
}
