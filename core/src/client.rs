//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Executing the round-trip is the job of a `Transport`, which keeps this
//! module deterministic and free of I/O.

use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

/// Where the REST backend listens by default.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl Default for TodoClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos", self.base_url),
            headers: json_headers(),
            body: Some(to_json(input)?),
        })
    }

    /// `PATCH /todos/:id` with the replacement text.
    pub fn build_update_todo(&self, id: &TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            path: self.item_path(id),
            headers: json_headers(),
            body: Some(to_json(input)?),
        })
    }

    /// `PUT /todos/:id` with no body; the server flips `completed`.
    pub fn build_toggle_todo(&self, id: &TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Put,
            path: self.item_path(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_path(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, &[200, 201])?;
        from_json(&response.body)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, &[200])?;
        from_json(&response.body)
    }

    /// The delete response body is ignored.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }

    fn item_path(&self, id: &TodoId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn to_json<T: serde::Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map unexpected status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    debug!(status = response.status, ?expected, "unexpected response status");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
