//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any schema drift between the two crates. The REST
//! backend names the identifier `_id`, so `Todo` renames it on the wire and
//! also accepts a plain `id`.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque record identifier. Assigned by the server for remote records and
/// by `LocalAdapter` for records kept in a local file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random identifier for locally created records.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    #[serde(rename = "_id", alias = "id")]
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub text: String,
}

/// Request payload for replacing the text of an existing todo (`PATCH`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub text: String,
}
