//! Turns what the user typed (`2`, `65f1a`) into a record id.

use anyhow::{bail, Result};
use todolist_core::{Todo, TodoId};

/// Resolve a 1-based position, an exact id, or a unique id prefix.
pub fn resolve(todos: &[Todo], reference: &str) -> Result<TodoId> {
    let reference = reference.trim().trim_start_matches('#');
    if reference.is_empty() {
        bail!("expected a position or an id");
    }

    if let Ok(position) = reference.parse::<usize>() {
        if let Some(todo) = position.checked_sub(1).and_then(|i| todos.get(i)) {
            return Ok(todo.id.clone());
        }
    }

    if let Some(todo) = todos.iter().find(|todo| todo.id.as_str() == reference) {
        return Ok(todo.id.clone());
    }

    let mut matches = todos
        .iter()
        .filter(|todo| todo.id.as_str().starts_with(reference));
    match (matches.next(), matches.next()) {
        (Some(todo), None) => Ok(todo.id.clone()),
        (Some(_), Some(_)) => bail!("{reference:?} matches more than one todo"),
        (None, _) => bail!("no todo at {reference:?} (list has {} items)", todos.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todos() -> Vec<Todo> {
        ["abc1", "abd2", "9"]
            .iter()
            .map(|id| Todo {
                id: TodoId::from(*id),
                text: format!("task {id}"),
                completed: false,
            })
            .collect()
    }

    #[test]
    fn position_is_one_based() {
        assert_eq!(resolve(&todos(), "1").unwrap().as_str(), "abc1");
        assert_eq!(resolve(&todos(), "#2").unwrap().as_str(), "abd2");
    }

    #[test]
    fn out_of_range_number_falls_back_to_id() {
        assert_eq!(resolve(&todos(), "9").unwrap().as_str(), "9");
        assert!(resolve(&todos(), "0").is_err());
    }

    #[test]
    fn unique_prefix_resolves() {
        assert_eq!(resolve(&todos(), "abc").unwrap().as_str(), "abc1");
    }

    #[test]
    fn ambiguous_prefix_is_an_error() {
        let err = resolve(&todos(), "ab").unwrap_err();
        assert!(err.to_string().contains("more than one"));
    }

    #[test]
    fn empty_reference_is_an_error() {
        assert!(resolve(&todos(), "  ").is_err());
    }
}
