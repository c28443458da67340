//! Client core for a to-do list backed by a REST service or a local file.
//!
//! # Overview
//! `TodoStore` owns the list, the input text and the edit-mode marker, and
//! applies user `Intent`s through a `SyncAdapter`. The REST adapter follows
//! the host-does-IO pattern: `TodoClient` builds `HttpRequest` values and
//! parses `HttpResponse` values, while a `Transport` (by default `ureq`)
//! performs the round-trip under a `RetryPolicy`. The local adapter keeps the
//! whole list in one JSON file.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - State transitions are the pure `store::reduce`; the store serializes
//!   every backend call through `dispatch(&mut self, ..)`.
//! - Records are addressed by stable id only, never by position.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod local;
pub mod retry;
pub mod store;
pub mod transport;
pub mod types;

pub use adapter::{LocalAdapter, RemoteAdapter, SyncAdapter};
pub use client::TodoClient;
pub use config::{Backend, ClientConfig, ConfigError};
pub use error::{ApiError, StorageError, SyncError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use local::LocalStore;
pub use retry::RetryPolicy;
pub use store::{EditMode, Intent, TodoState, TodoStore};
pub use transport::{Transport, UreqTransport};
pub use types::{CreateTodo, Todo, TodoId, UpdateTodo};
