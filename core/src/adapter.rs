//! Sync adapters: where store mutations meet the network or the disk.
//!
//! # Design
//! `SyncAdapter` is the seam between `TodoStore` and a backend. Each method
//! performs one backend operation and returns the record as the backend now
//! sees it; the store folds that result into its state. Adapters never touch
//! store state themselves, so a failed call leaves the store unchanged.

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::{ApiError, StorageError, SyncError};
use crate::http::{HttpRequest, HttpResponse};
use crate::local::LocalStore;
use crate::retry::RetryPolicy;
use crate::transport::{Transport, UreqTransport};
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

/// One backend holding the todo list.
pub trait SyncAdapter {
    /// Fetch the full list.
    fn load(&mut self) -> Result<Vec<Todo>, SyncError>;

    /// Create a record with `text` and `completed == false`.
    fn create(&mut self, text: &str) -> Result<Todo, SyncError>;

    /// Replace the text of `id`.
    fn update_text(&mut self, id: &TodoId, text: &str) -> Result<Todo, SyncError>;

    /// Flip the completion flag of `id`.
    fn toggle(&mut self, id: &TodoId) -> Result<Todo, SyncError>;

    fn delete(&mut self, id: &TodoId) -> Result<(), SyncError>;
}

impl<A: SyncAdapter + ?Sized> SyncAdapter for Box<A> {
    fn load(&mut self) -> Result<Vec<Todo>, SyncError> {
        (**self).load()
    }

    fn create(&mut self, text: &str) -> Result<Todo, SyncError> {
        (**self).create(text)
    }

    fn update_text(&mut self, id: &TodoId, text: &str) -> Result<Todo, SyncError> {
        (**self).update_text(id, text)
    }

    fn toggle(&mut self, id: &TodoId) -> Result<Todo, SyncError> {
        (**self).toggle(id)
    }

    fn delete(&mut self, id: &TodoId) -> Result<(), SyncError> {
        (**self).delete(id)
    }
}

// ---------------------------------------------------------------------------
// REST
// ---------------------------------------------------------------------------

/// Talks to the `/todos` REST API through a `Transport`.
#[derive(Debug, Clone)]
pub struct RemoteAdapter<T = UreqTransport> {
    client: TodoClient,
    transport: T,
    retry: RetryPolicy,
}

impl<T: Transport> RemoteAdapter<T> {
    pub fn new(client: TodoClient, transport: T, retry: RetryPolicy) -> Self {
        Self {
            client,
            transport,
            retry,
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        Ok(self.retry.execute(&self.transport, &request)?)
    }
}

impl<T: Transport> SyncAdapter for RemoteAdapter<T> {
    fn load(&mut self) -> Result<Vec<Todo>, SyncError> {
        let request = self.client.build_list_todos();
        self.send(request)
            .and_then(|response| self.client.parse_list_todos(response))
            .map_err(|err| SyncError::from_api(err, None))
    }

    fn create(&mut self, text: &str) -> Result<Todo, SyncError> {
        let input = CreateTodo {
            text: text.to_string(),
        };
        self.client
            .build_create_todo(&input)
            .and_then(|request| self.send(request))
            .and_then(|response| self.client.parse_create_todo(response))
            .map_err(|err| SyncError::from_api(err, None))
    }

    fn update_text(&mut self, id: &TodoId, text: &str) -> Result<Todo, SyncError> {
        let input = UpdateTodo {
            text: text.to_string(),
        };
        self.client
            .build_update_todo(id, &input)
            .and_then(|request| self.send(request))
            .and_then(|response| self.client.parse_update_todo(response))
            .map_err(|err| SyncError::from_api(err, Some(id)))
    }

    fn toggle(&mut self, id: &TodoId) -> Result<Todo, SyncError> {
        let request = self.client.build_toggle_todo(id);
        self.send(request)
            .and_then(|response| self.client.parse_toggle_todo(response))
            .map_err(|err| SyncError::from_api(err, Some(id)))
    }

    fn delete(&mut self, id: &TodoId) -> Result<(), SyncError> {
        let request = self.client.build_delete_todo(id);
        match self
            .send(request)
            .and_then(|response| self.client.parse_delete_todo(response))
        {
            Ok(()) => Ok(()),
            // A retried DELETE may have landed on an earlier attempt.
            Err(ApiError::NotFound) => {
                warn!(%id, "server has no such todo, treating as deleted");
                Ok(())
            }
            Err(err) => Err(SyncError::from_api(err, Some(id))),
        }
    }
}

// ---------------------------------------------------------------------------
// Local file
// ---------------------------------------------------------------------------

/// Keeps the list in one `LocalStore` key, rewritten after every mutation.
#[derive(Debug)]
pub struct LocalAdapter {
    store: LocalStore,
    todos: Option<Vec<Todo>>,
}

impl LocalAdapter {
    pub fn new(store: LocalStore) -> Self {
        Self { store, todos: None }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    fn current(&mut self) -> Result<&[Todo], SyncError> {
        if self.todos.is_none() {
            self.load()?;
        }
        Ok(self.todos.as_deref().unwrap_or_default())
    }

    /// Persist `next` and only then adopt it as the in-memory copy.
    fn commit(&mut self, next: Vec<Todo>) -> Result<(), SyncError> {
        self.store.save(&next)?;
        self.todos = Some(next);
        Ok(())
    }

    fn modify(
        &mut self,
        id: &TodoId,
        change: impl FnOnce(&mut Todo),
    ) -> Result<Todo, SyncError> {
        let mut next = self.current()?.to_vec();
        let todo = next
            .iter_mut()
            .find(|todo| todo.id == *id)
            .ok_or_else(|| SyncError::NotFound(id.clone()))?;
        change(todo);
        let updated = todo.clone();
        self.commit(next)?;
        Ok(updated)
    }
}

impl SyncAdapter for LocalAdapter {
    fn load(&mut self) -> Result<Vec<Todo>, SyncError> {
        let todos = match self.store.load() {
            Ok(todos) => todos,
            Err(err @ StorageError::Malformed { .. }) => {
                warn!(error = %err, "stored todo list is unreadable, starting empty");
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };
        debug!(count = todos.len(), path = %self.store.path().display(), "loaded local todos");
        self.todos = Some(todos.clone());
        Ok(todos)
    }

    fn create(&mut self, text: &str) -> Result<Todo, SyncError> {
        let todo = Todo {
            id: TodoId::generate(),
            text: text.to_string(),
            completed: false,
        };
        let mut next = self.current()?.to_vec();
        next.push(todo.clone());
        self.commit(next)?;
        Ok(todo)
    }

    fn update_text(&mut self, id: &TodoId, text: &str) -> Result<Todo, SyncError> {
        self.modify(id, |todo| todo.text = text.to_string())
    }

    fn toggle(&mut self, id: &TodoId) -> Result<Todo, SyncError> {
        self.modify(id, |todo| todo.completed = !todo.completed)
    }

    fn delete(&mut self, id: &TodoId) -> Result<(), SyncError> {
        let current = self.current()?;
        if !current.iter().any(|todo| todo.id == *id) {
            return Err(SyncError::NotFound(id.clone()));
        }
        let next = current.iter().filter(|todo| todo.id != *id).cloned().collect();
        self.commit(next)
    }
}
