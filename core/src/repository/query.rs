//! Filters and orderings shared by the in-process stores. Inputs are
//! expected in ascending id order; sorts are stable so ties keep it.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::model::todo::Todo;

pub fn active_by_priority_desc(todos: Vec<Todo>) -> Vec<Todo> {
    let mut active: Vec<Todo> = todos.into_iter().filter(|t| !t.completed).collect();
    active.sort_by(|a, b| b.priority.cmp(&a.priority));
    active
}

/// Records never updated sort last.
pub fn completed_by_updated_at_desc(todos: Vec<Todo>) -> Vec<Todo> {
    let mut done: Vec<Todo> = todos.into_iter().filter(|t| t.completed).collect();
    done.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    done
}

pub fn text_contains(todos: Vec<Todo>, term: &str) -> Vec<Todo> {
    todos.into_iter().filter(|t| t.matches_text(term)).collect()
}

pub fn overdue(todos: Vec<Todo>, now: DateTime<Utc>) -> Vec<Todo> {
    todos.into_iter().filter(|t| t.is_overdue(now)).collect()
}

pub fn due_on(todos: Vec<Todo>, date: NaiveDate, offset: &FixedOffset) -> Vec<Todo> {
    todos.into_iter().filter(|t| t.is_due_on(date, offset)).collect()
}
