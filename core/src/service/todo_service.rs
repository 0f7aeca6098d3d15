use chrono::{DateTime, Offset, TimeZone, Utc};
use tracing::{debug, info};

use crate::error::{Result, TodoError};
use crate::model::stats::TodoStats;
use crate::model::todo::{CreateTodo, Todo, TodoId, TodoPatch};
use crate::model::validate;
use crate::repository::TodoStore;
use crate::service::clock::{Clock, SystemClock};

/// Business rules for todos. Holds no state of its own beyond the store
/// handle and the clock used for stamping.
pub struct TodoService<R: TodoStore, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: TodoStore> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: TodoStore, C: Clock> TodoService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn store(&self) -> &R {
        &self.repo
    }

    // Queries

    pub fn list_all(&self) -> Result<Vec<Todo>> {
        debug!("listing all todos");
        Ok(self.repo.find_all()?)
    }

    pub fn list_active(&self) -> Result<Vec<Todo>> {
        debug!("listing active todos");
        Ok(self.repo.find_active_ordered_by_priority_desc()?)
    }

    pub fn list_completed(&self) -> Result<Vec<Todo>> {
        debug!("listing completed todos");
        Ok(self.repo.find_completed_ordered_by_updated_at_desc()?)
    }

    pub fn get_by_id(&self, id: TodoId) -> Result<Todo> {
        debug!(%id, "fetching todo");
        self.repo.find_by_id(id)?.ok_or(TodoError::NotFound(id))
    }

    /// Blank or missing terms return everything.
    pub fn search(&self, term: Option<&str>) -> Result<Vec<Todo>> {
        match term.map(str::trim).filter(|t| !t.is_empty()) {
            None => self.list_all(),
            Some(term) => {
                debug!(term, "searching todos");
                Ok(self.repo.find_by_text_contains(term)?)
            }
        }
    }

    pub fn list_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Todo>> {
        debug!(%now, "listing overdue todos");
        Ok(self.repo.find_overdue(now)?)
    }

    /// Active todos due on the calendar date of `now`, in `now`'s offset.
    pub fn list_due_today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<Vec<Todo>> {
        let offset = now.offset().fix();
        let today = now.date_naive();
        debug!(%today, %offset, "listing todos due today");
        Ok(self.repo.find_due_on_date(today, offset)?)
    }

    pub fn get_stats(&self, now: DateTime<Utc>) -> Result<TodoStats> {
        debug!(%now, "computing todo stats");
        let completed = self.repo.count_completed()?;
        let active = self.repo.count_active()?;
        let overdue = self.list_overdue(now)?.len() as u64;

        Ok(TodoStats {
            total: completed + active,
            completed,
            active,
            overdue: overdue.min(active),
        })
    }

    // Mutations

    pub fn create(&self, input: CreateTodo) -> Result<Todo> {
        let record = validate::new_todo(input, self.clock.now())?;
        let id = self.repo.insert(record.clone())?;
        info!(%id, priority = %record.priority, "todo created");
        Ok(record.into_todo(id))
    }

    pub fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo> {
        let mut todo = self.get_by_id(id)?;

        if let Some(title) = patch.title.as_deref() {
            todo.title = validate::title(title)?;
        }
        if let Some(description) = patch.description {
            todo.description = validate::description(description.as_deref())?;
        }
        if let Some(priority) = patch.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            todo.due_date = due_date;
        }

        self.stamp(&mut todo);
        self.persist(&todo)?;
        info!(%id, "todo updated");
        Ok(todo)
    }

    pub fn delete(&self, id: TodoId) -> Result<()> {
        if !self.repo.delete_by_id(id)? {
            return Err(TodoError::NotFound(id));
        }
        info!(%id, "todo deleted");
        Ok(())
    }

    /// The only operation that changes completion state.
    pub fn toggle_completed(&self, id: TodoId, completed: bool) -> Result<Todo> {
        let mut todo = self.get_by_id(id)?;
        todo.completed = completed;
        self.stamp(&mut todo);
        self.persist(&todo)?;
        info!(%id, completed, "todo completion toggled");
        Ok(todo)
    }

    pub fn mark_completed(&self, id: TodoId) -> Result<Todo> {
        self.toggle_completed(id, true)
    }

    pub fn mark_incomplete(&self, id: TodoId) -> Result<Todo> {
        self.toggle_completed(id, false)
    }

    fn stamp(&self, todo: &mut Todo) {
        todo.updated_at = Some(self.clock.now().max(todo.created_at));
    }

    // A record deleted between read and write surfaces as NotFound.
    fn persist(&self, todo: &Todo) -> Result<()> {
        if self.repo.save(todo)? {
            Ok(())
        } else {
            Err(TodoError::NotFound(todo.id))
        }
    }
}
