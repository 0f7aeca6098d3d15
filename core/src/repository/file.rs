use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::todo::{NewTodo, Todo, TodoId};
use crate::repository::query;
use crate::repository::traits::TodoStore;

pub const DEFAULT_FILE_NAME: &str = "todos.json";

#[derive(Serialize, Deserialize, Debug, Default)]
struct TodoFile {
    // Highest id ever handed out, so deleted ids stay retired.
    last_id: u64,
    todos: Vec<Todo>,
}

/// JSON file store. The whole file is read and rewritten on every call.
#[derive(Clone, Debug)]
pub struct FileTodoStore {
    file_path: PathBuf,
}

impl FileTodoStore {
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;
        let file_path = data_dir.join(DEFAULT_FILE_NAME);

        let store = FileTodoStore { file_path };
        if !store.file_path.exists() {
            debug!(path = %store.file_path.display(), "initialising todo file");
            store.write_file(&TodoFile::default())?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_file(&self) -> Result<TodoFile> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("opening {}", self.file_path.display()))?;
        let reader = BufReader::new(file);
        let mut data: TodoFile = serde_json::from_reader(reader)
            .with_context(|| format!("parsing {}", self.file_path.display()))?;
        data.todos.sort_by_key(|t| t.id);
        Ok(data)
    }

    fn write_file(&self, data: &TodoFile) -> Result<()> {
        let file = File::create(&self.file_path)
            .with_context(|| format!("writing {}", self.file_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, data)?;
        writer.flush()?;
        Ok(())
    }

    fn read_todos(&self) -> Result<Vec<Todo>> {
        Ok(self.read_file()?.todos)
    }
}

impl TodoStore for FileTodoStore {
    fn insert(&self, todo: NewTodo) -> Result<TodoId> {
        let mut data = self.read_file()?;
        // Files edited by hand may carry ids above the counter.
        let max_seen = data.todos.iter().map(|t| t.id.0).max().unwrap_or(0);
        data.last_id = data.last_id.max(max_seen) + 1;
        let id = TodoId(data.last_id);
        data.todos.push(todo.into_todo(id));
        self.write_file(&data)?;
        Ok(id)
    }

    fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        Ok(self.read_todos()?.into_iter().find(|t| t.id == id))
    }

    fn find_all(&self) -> Result<Vec<Todo>> {
        self.read_todos()
    }

    fn find_active_ordered_by_priority_desc(&self) -> Result<Vec<Todo>> {
        Ok(query::active_by_priority_desc(self.read_todos()?))
    }

    fn find_completed_ordered_by_updated_at_desc(&self) -> Result<Vec<Todo>> {
        Ok(query::completed_by_updated_at_desc(self.read_todos()?))
    }

    fn find_by_text_contains(&self, term: &str) -> Result<Vec<Todo>> {
        Ok(query::text_contains(self.read_todos()?, term))
    }

    fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Todo>> {
        Ok(query::overdue(self.read_todos()?, now))
    }

    fn find_due_on_date(&self, date: NaiveDate, offset: FixedOffset) -> Result<Vec<Todo>> {
        Ok(query::due_on(self.read_todos()?, date, &offset))
    }

    fn count(&self) -> Result<u64> {
        Ok(self.read_todos()?.len() as u64)
    }

    fn count_completed(&self) -> Result<u64> {
        Ok(self.read_todos()?.iter().filter(|t| t.completed).count() as u64)
    }

    fn count_active(&self) -> Result<u64> {
        Ok(self.read_todos()?.iter().filter(|t| !t.completed).count() as u64)
    }

    fn save(&self, todo: &Todo) -> Result<bool> {
        let mut data = self.read_file()?;
        if let Some(pos) = data.todos.iter().position(|t| t.id == todo.id) {
            data.todos[pos] = todo.clone();
            self.write_file(&data)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn delete_by_id(&self, id: TodoId) -> Result<bool> {
        let mut data = self.read_file()?;
        let initial_len = data.todos.len();
        data.todos.retain(|t| t.id != id);

        if data.todos.len() == initial_len {
            return Ok(false);
        }

        self.write_file(&data)?;
        Ok(true)
    }
}
