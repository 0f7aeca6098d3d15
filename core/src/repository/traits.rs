use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::model::todo::{NewTodo, Todo, TodoId};

/// Persistence collaborator for todos.
///
/// Implementations own record storage and query mechanics; they apply no
/// business rules beyond the filters and orderings each method names.
pub trait TodoStore {
    fn insert(&self, todo: NewTodo) -> Result<TodoId>;
    fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>>;
    /// Ascending id.
    fn find_all(&self) -> Result<Vec<Todo>>;
    /// Incomplete todos, highest priority first.
    fn find_active_ordered_by_priority_desc(&self) -> Result<Vec<Todo>>;
    /// Completed todos, most recently updated first.
    fn find_completed_ordered_by_updated_at_desc(&self) -> Result<Vec<Todo>>;
    /// Case-insensitive substring match over title and description.
    fn find_by_text_contains(&self, term: &str) -> Result<Vec<Todo>>;
    fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Todo>>;
    fn find_due_on_date(&self, date: NaiveDate, offset: FixedOffset) -> Result<Vec<Todo>>;
    fn count(&self) -> Result<u64>;
    fn count_completed(&self) -> Result<u64>;
    fn count_active(&self) -> Result<u64>;
    /// Overwrites an existing record. Returns `false` if the id is unknown.
    fn save(&self, todo: &Todo) -> Result<bool>;
    /// Returns whether the record existed.
    fn delete_by_id(&self, id: TodoId) -> Result<bool>;
}

impl<S: TodoStore + ?Sized> TodoStore for &S {
    fn insert(&self, todo: NewTodo) -> Result<TodoId> {
        (**self).insert(todo)
    }
    fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        (**self).find_by_id(id)
    }
    fn find_all(&self) -> Result<Vec<Todo>> {
        (**self).find_all()
    }
    fn find_active_ordered_by_priority_desc(&self) -> Result<Vec<Todo>> {
        (**self).find_active_ordered_by_priority_desc()
    }
    fn find_completed_ordered_by_updated_at_desc(&self) -> Result<Vec<Todo>> {
        (**self).find_completed_ordered_by_updated_at_desc()
    }
    fn find_by_text_contains(&self, term: &str) -> Result<Vec<Todo>> {
        (**self).find_by_text_contains(term)
    }
    fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Todo>> {
        (**self).find_overdue(now)
    }
    fn find_due_on_date(&self, date: NaiveDate, offset: FixedOffset) -> Result<Vec<Todo>> {
        (**self).find_due_on_date(date, offset)
    }
    fn count(&self) -> Result<u64> {
        (**self).count()
    }
    fn count_completed(&self) -> Result<u64> {
        (**self).count_completed()
    }
    fn count_active(&self) -> Result<u64> {
        (**self).count_active()
    }
    fn save(&self, todo: &Todo) -> Result<bool> {
        (**self).save(todo)
    }
    fn delete_by_id(&self, id: TodoId) -> Result<bool> {
        (**self).delete_by_id(id)
    }
}
