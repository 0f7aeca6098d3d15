use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::model::todo::{NewTodo, Todo, TodoId};
use crate::repository::query;
use crate::repository::traits::TodoStore;

#[derive(Debug, Default)]
struct State {
    last_id: u64,
    todos: BTreeMap<TodoId, Todo>,
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    state: Mutex<State>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("todo store lock poisoned"))
    }

    fn snapshot(&self) -> Result<Vec<Todo>> {
        Ok(self.lock()?.todos.values().cloned().collect())
    }
}

impl TodoStore for MemoryTodoStore {
    fn insert(&self, todo: NewTodo) -> Result<TodoId> {
        let mut state = self.lock()?;
        state.last_id += 1;
        let id = TodoId(state.last_id);
        state.todos.insert(id, todo.into_todo(id));
        Ok(id)
    }

    fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        Ok(self.lock()?.todos.get(&id).cloned())
    }

    fn find_all(&self) -> Result<Vec<Todo>> {
        self.snapshot()
    }

    fn find_active_ordered_by_priority_desc(&self) -> Result<Vec<Todo>> {
        Ok(query::active_by_priority_desc(self.snapshot()?))
    }

    fn find_completed_ordered_by_updated_at_desc(&self) -> Result<Vec<Todo>> {
        Ok(query::completed_by_updated_at_desc(self.snapshot()?))
    }

    fn find_by_text_contains(&self, term: &str) -> Result<Vec<Todo>> {
        Ok(query::text_contains(self.snapshot()?, term))
    }

    fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Todo>> {
        Ok(query::overdue(self.snapshot()?, now))
    }

    fn find_due_on_date(&self, date: NaiveDate, offset: FixedOffset) -> Result<Vec<Todo>> {
        Ok(query::due_on(self.snapshot()?, date, &offset))
    }

    fn count(&self) -> Result<u64> {
        Ok(self.lock()?.todos.len() as u64)
    }

    fn count_completed(&self) -> Result<u64> {
        Ok(self.lock()?.todos.values().filter(|t| t.completed).count() as u64)
    }

    fn count_active(&self) -> Result<u64> {
        Ok(self.lock()?.todos.values().filter(|t| !t.completed).count() as u64)
    }

    fn save(&self, todo: &Todo) -> Result<bool> {
        let mut state = self.lock()?;
        match state.todos.get_mut(&todo.id) {
            Some(slot) => {
                *slot = todo.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_by_id(&self, id: TodoId) -> Result<bool> {
        Ok(self.lock()?.todos.remove(&id).is_some())
    }
}
