//! PostgreSQL repositories built on `sqlx`.
//!
//! Rows are read into plain `FromRow` structs and converted to entities with explicit
//! mapping functions, so the entities stay free of database concerns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{TaskRepository, UserRepository};
use crate::error::{AppError, AppResult};
use crate::models::{Email, Pagination, Task, TaskId, TaskPage, User, UserId};

const USER_COLUMNS: &str = "id, email, username, hashed_password, is_active, created_at, updated_at";
const TASK_COLUMNS: &str = "id, user_id, title, description, completed, created_at, updated_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    username: String,
    hashed_password: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl UserRow {
    fn into_entity(self) -> AppResult<User> {
        let email = Email::parse(&self.email).map_err(|_| {
            AppError::InternalServerError(format!("Stored email for user {} is invalid", self.id))
        })?;
        Ok(User {
            id: UserId::from(self.id),
            email,
            username: self.username,
            hashed_password: self.hashed_password,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: TaskId::from(row.id),
            user_id: UserId::from(row.user_id),
            title: row.title,
            description: row.description,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `UserRepository` over the `users` table.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.id.as_uuid())
            .bind(user.email.as_str())
            .bind(&user.username)
            .bind(&user.hashed_password)
            .bind(user.is_active)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await?;

        row.into_entity()
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .map(UserRow::into_entity)
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(UserRow::into_entity)
            .transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

/// `TaskRepository` over the `tasks` table.
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, task: &Task) -> AppResult<Task> {
        let sql = format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {TASK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(task.id.as_uuid())
            .bind(task.user_id.as_uuid())
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.completed)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: TaskId, owner: UserId) -> AppResult<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Task::from))
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        pagination: Pagination,
        completed: Option<bool>,
    ) -> AppResult<TaskPage> {
        // A NULL filter matches both states.
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE user_id = $1 AND ($2::boolean IS NULL OR completed = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(owner.as_uuid())
            .bind(completed)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let total_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks \
             WHERE user_id = $1 AND ($2::boolean IS NULL OR completed = $2)",
        )
        .bind(owner.as_uuid())
        .bind(completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(TaskPage {
            tasks: rows.into_iter().map(Task::from).collect(),
            total_count: total_count.max(0) as u64,
            pagination,
        })
    }

    async fn update(&self, task: &Task) -> AppResult<Option<Task>> {
        let sql = format!(
            "UPDATE tasks SET title = $1, description = $2, completed = $3, updated_at = $4 \
             WHERE id = $5 AND user_id = $6 \
             RETURNING {TASK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.completed)
            .bind(task.updated_at)
            .bind(task.id.as_uuid())
            .bind(task.user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Task::from))
    }

    async fn delete(&self, id: TaskId, owner: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
