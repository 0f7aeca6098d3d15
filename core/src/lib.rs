pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod seed;
pub mod service;
pub mod time;

pub use config::Config;
pub use error::{Field, Rule, TodoError, ValidationError};
pub use model::{CreateTodo, NewTodo, Priority, Todo, TodoId, TodoPatch, TodoStats};
pub use repository::{FileTodoStore, MemoryTodoStore, TodoStore};
pub use input::{parse_args, parse_with_keys, expand_key, ParsedInput};
pub use time::parse_due;
pub use service::{Clock, FixedClock, SystemClock, TodoService};
