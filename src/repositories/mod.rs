//! Persistence contracts for users and tasks.
//!
//! Use cases only see these traits. `postgres` holds the production implementation,
//! `memory` an implementation backed by process memory that the test suite runs against.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Email, Pagination, Task, TaskId, TaskPage, User, UserId};

pub use memory::{InMemoryTaskRepository, InMemoryUserRepository};
pub use postgres::{PgTaskRepository, PgUserRepository};

/// Storage for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user. Fails with `DuplicateEmail` / `DuplicateUsername` on a
    /// uniqueness conflict.
    async fn create(&self, user: &User) -> AppResult<User>;

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AppResult<bool>;

    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;
}

/// Storage for tasks. Every lookup and mutation is scoped to the owning user, so a
/// task owned by someone else is indistinguishable from a missing one.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: &Task) -> AppResult<Task>;

    /// Returns the task only if it exists and belongs to `owner`.
    async fn get_by_id(&self, id: TaskId, owner: UserId) -> AppResult<Option<Task>>;

    /// Returns one page of `owner`'s tasks, newest first, optionally filtered by
    /// completion state, together with the total number of matching tasks.
    async fn list_by_owner(
        &self,
        owner: UserId,
        pagination: Pagination,
        completed: Option<bool>,
    ) -> AppResult<TaskPage>;

    /// Persists the mutable fields of `task`. Returns `None` if the task is gone or
    /// is not owned by `task.user_id`.
    async fn update(&self, task: &Task) -> AppResult<Option<Task>>;

    /// Hard-deletes the task. Returns `false` when nothing owned by `owner` matched.
    async fn delete(&self, id: TaskId, owner: UserId) -> AppResult<bool>;
}
