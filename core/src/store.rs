//! The to-do list state container.
//!
//! # Design
//! `TodoState` is plain data: the ordered records, the input text and the
//! edit-mode marker. It only changes through [`reduce`], a pure function of
//! the previous state and an [`Event`]. `TodoStore` turns user [`Intent`]s
//! into events, calling the `SyncAdapter` in between when the intent needs
//! the backend. `dispatch` takes `&mut self`, so one intent finishes its
//! backend call before the next one starts and responses cannot interleave.

use tracing::{debug, warn};

use crate::adapter::SyncAdapter;
use crate::error::SyncError;
use crate::types::{Todo, TodoId};

/// Which record, if any, the input field is editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Idle,
    Editing(TodoId),
}

impl EditMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditMode::Editing(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoState {
    pub todos: Vec<Todo>,
    pub input: String,
    pub edit: EditMode,
}

impl TodoState {
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == *id)
    }

    pub fn contains(&self, id: &TodoId) -> bool {
        self.get(id).is_some()
    }
}

/// A user action, as the view reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Replace the list with the backend's current contents.
    Load,
    SetInput(String),
    /// Add the input as a new record, or update the record under edit.
    Submit,
    StartEdit(TodoId),
    CancelEdit,
    Toggle(TodoId),
    Delete(TodoId),
}

/// A change to fold into `TodoState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Loaded(Vec<Todo>),
    InputChanged(String),
    Added(Todo),
    /// A record came back from the backend after a toggle.
    Replaced(Todo),
    /// A record came back from the backend after an edit was submitted.
    Updated(Todo),
    Removed(TodoId),
    EditStarted(TodoId),
    EditCancelled,
    /// The record under edit is gone; the typed text is kept.
    EditTargetLost,
}

/// Apply `event` to `state`.
pub fn reduce(mut state: TodoState, event: Event) -> TodoState {
    match event {
        Event::Loaded(todos) => {
            state.todos = todos;
            let lost = matches!(&state.edit, EditMode::Editing(id) if !state.contains(id));
            if lost {
                state.edit = EditMode::Idle;
                state.input.clear();
            }
        }
        Event::InputChanged(input) => state.input = input,
        Event::Added(todo) => {
            state.todos.push(todo);
            state.input.clear();
        }
        Event::Replaced(todo) => replace(&mut state.todos, todo),
        Event::Updated(todo) => {
            replace(&mut state.todos, todo);
            state.input.clear();
            state.edit = EditMode::Idle;
        }
        Event::Removed(id) => {
            state.todos.retain(|todo| todo.id != id);
            if state.edit == EditMode::Editing(id) {
                state.edit = EditMode::Idle;
                state.input.clear();
            }
        }
        Event::EditStarted(id) => {
            if let Some(text) = state.get(&id).map(|todo| todo.text.clone()) {
                state.input = text;
                state.edit = EditMode::Editing(id);
            }
        }
        Event::EditCancelled => {
            if state.edit.is_editing() {
                state.edit = EditMode::Idle;
                state.input.clear();
            }
        }
        Event::EditTargetLost => state.edit = EditMode::Idle,
    }
    state
}

/// The backend lost a record that is still on screen.
fn missing_is_logged<T>(result: Result<T, SyncError>) -> Result<T, SyncError> {
    if let Err(SyncError::NotFound(id)) = &result {
        warn!(%id, "backend has no such todo");
    }
    result
}

fn replace(todos: &mut [Todo], updated: Todo) {
    if let Some(slot) = todos.iter_mut().find(|todo| todo.id == updated.id) {
        *slot = updated;
    }
}

/// Owns the state and the adapter; the single entry point for mutations.
#[derive(Debug)]
pub struct TodoStore<A> {
    adapter: A,
    state: TodoState,
}

impl<A: SyncAdapter> TodoStore<A> {
    /// A store with an empty list. Call `dispatch(Intent::Load)` to fill it.
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            state: TodoState::default(),
        }
    }

    /// A store loaded from the adapter.
    pub fn open(adapter: A) -> Result<Self, SyncError> {
        let mut store = Self::new(adapter);
        store.dispatch(Intent::Load)?;
        Ok(store)
    }

    pub fn state(&self) -> &TodoState {
        &self.state
    }

    pub fn todos(&self) -> &[Todo] {
        &self.state.todos
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Process one intent. On error the state is left as it was, except that
    /// submitting an edit for a vanished record drops the edit marker.
    pub fn dispatch(&mut self, intent: Intent) -> Result<(), SyncError> {
        debug!(?intent, "dispatch");
        match intent {
            Intent::Load => {
                let todos = self.adapter.load()?;
                self.apply(Event::Loaded(todos));
            }
            Intent::SetInput(input) => self.apply(Event::InputChanged(input)),
            Intent::Submit => self.submit()?,
            Intent::StartEdit(id) => {
                self.require(&id)?;
                self.apply(Event::EditStarted(id));
            }
            Intent::CancelEdit => self.apply(Event::EditCancelled),
            Intent::Toggle(id) => {
                self.require(&id)?;
                let todo = missing_is_logged(self.adapter.toggle(&id))?;
                self.apply(Event::Replaced(todo));
            }
            Intent::Delete(id) => {
                self.require(&id)?;
                missing_is_logged(self.adapter.delete(&id))?;
                self.apply(Event::Removed(id));
            }
        }
        Ok(())
    }

    fn submit(&mut self) -> Result<(), SyncError> {
        let text = self.state.input.trim().to_string();
        if text.is_empty() {
            debug!("ignoring empty submission");
            return Ok(());
        }

        match self.state.edit.clone() {
            EditMode::Idle => {
                let todo = self.adapter.create(&text)?;
                self.apply(Event::Added(todo));
            }
            EditMode::Editing(id) => {
                if let Err(err) = self.require(&id) {
                    self.apply(Event::EditTargetLost);
                    return Err(err);
                }
                match missing_is_logged(self.adapter.update_text(&id, &text)) {
                    Ok(todo) => self.apply(Event::Updated(todo)),
                    Err(err @ SyncError::NotFound(_)) => {
                        self.apply(Event::EditTargetLost);
                        return Err(err);
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(())
    }

    /// Records are addressed from what is on screen; anything else is a
    /// logged no-op.
    fn require(&self, id: &TodoId) -> Result<(), SyncError> {
        if self.state.contains(id) {
            Ok(())
        } else {
            warn!(%id, "no such todo in the current list");
            Err(SyncError::NotFound(id.clone()))
        }
    }

    fn apply(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }
}
