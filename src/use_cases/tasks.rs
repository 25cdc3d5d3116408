use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Pagination, Task, TaskId, TaskPage, TaskPatch, UserId};
use crate::repositories::TaskRepository;

/// Task operations on behalf of an authenticated owner.
///
/// A task owned by someone else is reported exactly like a missing one.
#[derive(Clone)]
pub struct TaskUseCases {
    tasks: Arc<dyn TaskRepository>,
}

impl TaskUseCases {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    pub async fn create(
        &self,
        owner: UserId,
        title: &str,
        description: Option<&str>,
    ) -> AppResult<Task> {
        let task = Task::new(owner, title, description)?;
        let task = self.tasks.create(&task).await?;
        log::info!("Task {} created by {}", task.id, owner);
        Ok(task)
    }

    pub async fn get(&self, owner: UserId, id: TaskId) -> AppResult<Task> {
        self.tasks
            .get_by_id(id, owner)
            .await?
            .ok_or_else(AppError::task_not_found)
    }

    pub async fn list(
        &self,
        owner: UserId,
        pagination: Pagination,
        completed: Option<bool>,
    ) -> AppResult<TaskPage> {
        self.tasks.list_by_owner(owner, pagination, completed).await
    }

    /// Load, apply the fields present in `patch`, save.
    pub async fn update(&self, owner: UserId, id: TaskId, patch: &TaskPatch) -> AppResult<Task> {
        let mut task = self.get(owner, id).await?;
        task.apply(patch)?;
        // The task may have been deleted between load and save.
        self.tasks
            .update(&task)
            .await?
            .ok_or_else(AppError::task_not_found)
    }

    pub async fn delete(&self, owner: UserId, id: TaskId) -> AppResult<()> {
        if !self.tasks.delete(id, owner).await? {
            log::warn!("Delete of task {} by {} matched nothing", id, owner);
            return Err(AppError::task_not_found());
        }
        log::info!("Task {} deleted by {}", id, owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryTaskRepository;
    use pretty_assertions::assert_eq;

    fn use_cases() -> TaskUseCases {
        TaskUseCases::new(Arc::new(InMemoryTaskRepository::new()))
    }

    #[actix_rt::test]
    async fn test_create_and_get() {
        let tasks = use_cases();
        let owner = UserId::generate();
        let created = tasks
            .create(owner, "Write report", Some("Quarterly"))
            .await
            .unwrap();

        let fetched = tasks.get(owner, created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert!(!fetched.completed);
    }

    #[actix_rt::test]
    async fn test_foreign_task_is_not_found() {
        let tasks = use_cases();
        let owner = UserId::generate();
        let stranger = UserId::generate();
        let task = tasks.create(owner, "Private", None).await.unwrap();

        assert!(matches!(
            tasks.get(stranger, task.id).await,
            Err(AppError::NotFound(_))
        ));
        let patch = TaskPatch {
            completed: Some(true),
            ..TaskPatch::default()
        };
        assert!(matches!(
            tasks.update(stranger, task.id, &patch).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            tasks.delete(stranger, task.id).await,
            Err(AppError::NotFound(_))
        ));

        let untouched = tasks.get(owner, task.id).await.unwrap();
        assert!(!untouched.completed);
    }

    #[actix_rt::test]
    async fn test_update_only_completed() {
        let tasks = use_cases();
        let owner = UserId::generate();
        let task = tasks
            .create(owner, "Title", Some("Description"))
            .await
            .unwrap();

        let patch = TaskPatch {
            completed: Some(true),
            ..TaskPatch::default()
        };
        let updated = tasks.update(owner, task.id, &patch).await.unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.description.as_deref(), Some("Description"));
        assert!(updated.updated_at.is_some());
    }

    #[actix_rt::test]
    async fn test_update_rejects_blank_title() {
        let tasks = use_cases();
        let owner = UserId::generate();
        let task = tasks.create(owner, "Title", None).await.unwrap();

        let patch = TaskPatch {
            title: Some("   ".into()),
            ..TaskPatch::default()
        };
        assert!(matches!(
            tasks.update(owner, task.id, &patch).await,
            Err(AppError::ValidationError(_))
        ));
        assert_eq!(tasks.get(owner, task.id).await.unwrap().title, "Title");
    }

    #[actix_rt::test]
    async fn test_delete_twice() {
        let tasks = use_cases();
        let owner = UserId::generate();
        let task = tasks.create(owner, "Ephemeral", None).await.unwrap();

        tasks.delete(owner, task.id).await.unwrap();
        assert!(matches!(
            tasks.delete(owner, task.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn test_list_pages() {
        let tasks = use_cases();
        let owner = UserId::generate();
        for i in 0..25 {
            tasks.create(owner, &format!("Task {}", i), None).await.unwrap();
        }

        let mut sizes = Vec::new();
        for page in 1..=3 {
            let pagination = Pagination::new(Some(page), Some(10)).unwrap();
            let result = tasks.list(owner, pagination, None).await.unwrap();
            assert_eq!(result.total_count, 25);
            sizes.push(result.tasks.len());
        }
        assert_eq!(sizes, vec![10, 10, 5]);
    }
}
