use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::values::{TaskId, UserId};
use crate::error::AppError;

pub const TITLE_MAX_LENGTH: usize = 200;
pub const DESCRIPTION_MAX_LENGTH: usize = 1000;

/// A to-do item. Always owned by exactly one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    /// Owner of the task. Every read and write is scoped to this id.
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// `None` until the first effective change.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new, not yet completed task for `user_id`.
    pub fn new(user_id: UserId, title: &str, description: Option<&str>) -> Result<Self, AppError> {
        Ok(Self {
            id: TaskId::generate(),
            user_id,
            title: normalize_title(title)?,
            description: normalize_description(description)?,
            completed: false,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    pub fn belongs_to(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub fn update_title(&mut self, title: &str) -> Result<(), AppError> {
        self.title = normalize_title(title)?;
        self.touch();
        Ok(())
    }

    pub fn update_description(&mut self, description: Option<&str>) -> Result<(), AppError> {
        self.description = normalize_description(description)?;
        self.touch();
        Ok(())
    }

    pub fn mark_completed(&mut self) {
        if !self.completed {
            self.completed = true;
            self.touch();
        }
    }

    pub fn mark_incomplete(&mut self) {
        if self.completed {
            self.completed = false;
            self.touch();
        }
    }

    /// Applies the fields present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: &TaskPatch) -> Result<(), AppError> {
        if let Some(title) = &patch.title {
            self.update_title(title)?;
        }
        if let Some(description) = &patch.description {
            self.update_description(description.as_deref())?;
        }
        match patch.completed {
            Some(true) => self.mark_completed(),
            Some(false) => self.mark_incomplete(),
            None => {}
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

fn normalize_title(raw: &str) -> Result<String, AppError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::ValidationError("Task title cannot be empty".into()));
    }
    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(AppError::ValidationError(format!(
            "Task title cannot exceed {} characters",
            TITLE_MAX_LENGTH
        )));
    }
    Ok(title.to_string())
}

// Blank descriptions are stored as NULL.
fn normalize_description(raw: Option<&str>) -> Result<Option<String>, AppError> {
    let description = match raw.map(str::trim) {
        Some(d) if !d.is_empty() => d,
        _ => return Ok(None),
    };
    if description.chars().count() > DESCRIPTION_MAX_LENGTH {
        return Err(AppError::ValidationError(format!(
            "Task description cannot exceed {} characters",
            DESCRIPTION_MAX_LENGTH
        )));
    }
    Ok(Some(description.to_string()))
}

/// Request body for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Request body for a partial update. Absent fields are left as they are.
///
/// `description` distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`), which clears the description.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,

    pub completed: Option<bool>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    /// 1-based page number, defaults to 1.
    pub page: Option<i64>,
    /// Page size, defaults to 20, at most 100.
    pub page_size: Option<i64>,
    /// Only completed (`true`) or only pending (`false`) tasks.
    pub completed: Option<bool>,
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Result<Self, AppError> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(Self::DEFAULT_PAGE_SIZE as i64);

        if page < 1 {
            return Err(AppError::ValidationError(
                "page must be greater than or equal to 1".into(),
            ));
        }
        if page > u32::MAX as i64 {
            return Err(AppError::ValidationError(format!(
                "page must be at most {}",
                u32::MAX
            )));
        }
        if !(1..=Self::MAX_PAGE_SIZE as i64).contains(&page_size) {
            return Err(AppError::ValidationError(format!(
                "page_size must be between 1 and {}",
                Self::MAX_PAGE_SIZE
            )));
        }

        Ok(Self {
            page: page as u32,
            page_size: page_size as u32,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of an owner's tasks plus the total matching the same filter.
#[derive(Debug, Clone)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub total_count: u64,
    pub pagination: Pagination,
}

impl TaskPage {
    pub fn has_next(&self) -> bool {
        (self.pagination.offset() + self.tasks.len() as i64) < self.total_count as i64
    }
}

/// Task as returned by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Paged task listing as returned by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_next: bool,
}

impl From<TaskPage> for TaskListResponse {
    fn from(page: TaskPage) -> Self {
        let has_next = page.has_next();
        Self {
            tasks: page.tasks.into_iter().map(TaskResponse::from).collect(),
            total_count: page.total_count,
            page: page.pagination.page,
            page_size: page.pagination.page_size,
            has_next,
        }
    }
}
