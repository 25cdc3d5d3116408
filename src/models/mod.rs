pub mod task;
pub mod user;
pub mod values;

pub use task::{
    Pagination, Task, TaskInput, TaskListResponse, TaskPage, TaskPatch, TaskQuery, TaskResponse,
};
pub use user::{User, UserResponse, USERNAME_REGEX};
pub use values::{Email, Password, TaskId, UserId};
