//! Single-key JSON file persistence for the local variant.
//!
//! # Design
//! The whole list lives under one key, a JSON file holding an array of
//! `{id, text, done}` records. Every save rewrites the file in full through a
//! sibling temp file and a rename, so readers never observe a half-written
//! list. Records written without an `id` get one assigned on load.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StorageError;
use crate::types::{Todo, TodoId};

/// File name used under the data directory when no path is configured.
pub const DEFAULT_FILE_NAME: &str = "todos.json";

/// On-disk shape of one record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTodo {
    #[serde(default = "TodoId::generate")]
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl From<StoredTodo> for Todo {
    fn from(stored: StoredTodo) -> Self {
        Todo {
            id: stored.id,
            text: stored.text,
            completed: stored.done,
        }
    }
}

impl From<&Todo> for StoredTodo {
    fn from(todo: &Todo) -> Self {
        StoredTodo {
            id: todo.id.clone(),
            text: todo.text.clone(),
            done: todo.completed,
        }
    }
}

/// One storage key backed by a JSON file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted list. A missing file is an empty list.
    pub fn load(&self) -> Result<Vec<Todo>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored todos yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let stored: Vec<StoredTodo> =
            serde_json::from_str(&raw).map_err(|source| StorageError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        Ok(stored.into_iter().map(Todo::from).collect())
    }

    /// Replace the persisted list with `todos`.
    pub fn save(&self, todos: &[Todo]) -> Result<(), StorageError> {
        let stored: Vec<StoredTodo> = todos.iter().map(StoredTodo::from).collect();
        let json = serde_json::to_string_pretty(&stored)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = todos.len(), "saved todos");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
