pub mod file;
pub mod memory;
pub mod query;
pub mod traits;

// Re-export
pub use file::FileTodoStore;
pub use memory::MemoryTodoStore;
pub use traits::TodoStore;
