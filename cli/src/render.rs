//! Text rendering of the list and the input line.

use std::fmt::Write;

use todolist_core::{EditMode, Todo, TodoState};

/// Label of the submit button for the current edit mode.
pub fn submit_label(edit: &EditMode) -> &'static str {
    match edit {
        EditMode::Idle => "Add",
        EditMode::Editing(_) => "Update",
    }
}

/// Label of a record's toggle button.
pub fn toggle_label(todo: &Todo) -> &'static str {
    if todo.completed {
        "Undo"
    } else {
        "Complete"
    }
}

/// One line per record: position, checkbox, text, id. The record under edit
/// is marked with `*`.
pub fn list(state: &TodoState) -> String {
    rows(state, false)
}

/// The list with per-record buttons, followed by the input line.
pub fn screen(state: &TodoState) -> String {
    let mut out = rows(state, true);
    let _ = writeln!(out, "> {:?} [{}]", state.input, submit_label(&state.edit));
    out
}

fn rows(state: &TodoState, buttons: bool) -> String {
    if state.todos.is_empty() {
        return "No todos yet.\n".to_string();
    }
    let mut out = String::new();
    for (i, todo) in state.todos.iter().enumerate() {
        let check = if todo.completed { "x" } else { " " };
        let marker = match &state.edit {
            EditMode::Editing(id) if *id == todo.id => "*",
            _ => " ",
        };
        let _ = write!(out, "{marker}{:>3}. [{check}] {}  ({})", i + 1, todo.text, todo.id);
        if buttons {
            let _ = write!(out, "  [{}] [Edit] [Delete]", toggle_label(todo));
        }
        out.push('\n');
    }
    out
}
