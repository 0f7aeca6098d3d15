pub mod stats;
pub mod todo;
pub mod validate;

pub use stats::TodoStats;
pub use todo::{CreateTodo, NewTodo, Priority, Todo, TodoId, TodoPatch};
