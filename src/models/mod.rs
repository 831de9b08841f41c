pub mod task;
pub mod user;

pub use task::{PopulatedTask, Task, TaskInput, TaskStatus, TaskUpdate};
pub use user::{PublicUser, User};
