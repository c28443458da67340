//! Error types for the todo client.
//!
//! # Design
//! Errors are layered the way the client is: `TransportError` for the raw
//! round-trip, `ApiError` for REST protocol handling, `StorageError` for the
//! local file, and `SyncError` for what a `SyncAdapter` or the store reports.
//! `NotFound` gets a dedicated variant at every layer because the store
//! treats a missing record as a logged no-op rather than a failure.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::TodoId;

/// Failure to complete an HTTP round-trip at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),
}

/// Errors returned by `TodoClient` and `RemoteAdapter`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status the operation does not expect.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors from reading or writing the local storage file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed todo list in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize todo list: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors surfaced by sync adapters and `TodoStore::dispatch`.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The backend could not be reached or answered with an error.
    #[error("network failure")]
    NetworkFailure(#[source] ApiError),

    /// The addressed record does not exist.
    #[error("todo {0} not found")]
    NotFound(TodoId),

    /// The persisted list could not be parsed.
    #[error(transparent)]
    MalformedPersistedState(StorageError),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for SyncError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Malformed { .. } => SyncError::MalformedPersistedState(err),
            other => SyncError::Storage(other),
        }
    }
}

impl SyncError {
    /// Map an `ApiError` for an operation addressed at `id`.
    pub(crate) fn from_api(err: ApiError, id: Option<&TodoId>) -> Self {
        match (err, id) {
            (ApiError::NotFound, Some(id)) => SyncError::NotFound(id.clone()),
            (err, _) => SyncError::NetworkFailure(err),
        }
    }
}
