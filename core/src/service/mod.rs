pub mod clock;
pub mod todo_service;

mod todo_service_test;

pub use clock::{Clock, FixedClock, SystemClock};
pub use todo_service::TodoService;
