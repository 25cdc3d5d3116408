//! In-process repositories. They honour the same contracts as the PostgreSQL ones
//! (uniqueness, owner scoping, ordering) and let the whole HTTP stack run without a
//! database.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{TaskRepository, UserRepository};
use crate::error::{AppError, AppResult};
use crate::models::{Email, Pagination, Task, TaskId, TaskPage, User, UserId};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::DuplicateUsername);
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AppResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.username == username))
    }
}

#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: &Task) -> AppResult<Task> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn get_by_id(&self, id: TaskId, owner: UserId) -> AppResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).filter(|t| t.belongs_to(owner)).cloned())
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        pagination: Pagination,
        completed: Option<bool>,
    ) -> AppResult<TaskPage> {
        let tasks = self.tasks.read().await;
        let mut matching: Vec<&Task> = tasks
            .values()
            .filter(|t| t.belongs_to(owner))
            .filter(|t| completed.map_or(true, |c| t.completed == c))
            .collect();
        // Newest first, ties broken by id as in the SQL ORDER BY.
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(&a.id.as_uuid()))
        });

        let total_count = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .cloned()
            .collect();

        Ok(TaskPage {
            tasks: page,
            total_count,
            pagination,
        })
    }

    async fn update(&self, task: &Task) -> AppResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task.id) {
            Some(stored) if stored.belongs_to(task.user_id) => {
                stored.title = task.title.clone();
                stored.description = task.description.clone();
                stored.completed = task.completed;
                stored.updated_at = task.updated_at;
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: TaskId, owner: UserId) -> AppResult<bool> {
        let mut tasks = self.tasks.write().await;
        if tasks.get(&id).map_or(false, |t| t.belongs_to(owner)) {
            tasks.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, username: &str) -> User {
        User::new(Email::parse(email).unwrap(), username, "hash".into()).unwrap()
    }

    #[actix_rt::test]
    async fn test_user_uniqueness() {
        let repo = InMemoryUserRepository::new();
        repo.create(&user("a@example.com", "alice")).await.unwrap();

        assert!(matches!(
            repo.create(&user("A@Example.com", "other")).await,
            Err(AppError::DuplicateEmail)
        ));
        assert!(matches!(
            repo.create(&user("b@example.com", "alice")).await,
            Err(AppError::DuplicateUsername)
        ));
        assert!(repo.exists_by_username("alice").await.unwrap());
    }

    #[actix_rt::test]
    async fn test_tasks_are_scoped_to_owner() {
        let repo = InMemoryTaskRepository::new();
        let owner = UserId::generate();
        let stranger = UserId::generate();
        let task = repo
            .create(&Task::new(owner, "Mine", None).unwrap())
            .await
            .unwrap();

        assert!(repo.get_by_id(task.id, owner).await.unwrap().is_some());
        assert!(repo.get_by_id(task.id, stranger).await.unwrap().is_none());

        let mut forged = task.clone();
        forged.user_id = stranger;
        forged.title = "Stolen".into();
        assert!(repo.update(&forged).await.unwrap().is_none());

        assert!(!repo.delete(task.id, stranger).await.unwrap());
        assert!(repo.delete(task.id, owner).await.unwrap());
        assert!(!repo.delete(task.id, owner).await.unwrap());
    }

    #[actix_rt::test]
    async fn test_list_filters_and_counts() {
        let repo = InMemoryTaskRepository::new();
        let owner = UserId::generate();
        for i in 0..5 {
            let mut task = Task::new(owner, &format!("Task {}", i), None).unwrap();
            if i % 2 == 0 {
                task.mark_completed();
            }
            repo.create(&task).await.unwrap();
        }
        repo.create(&Task::new(UserId::generate(), "Other", None).unwrap())
            .await
            .unwrap();

        let all = repo
            .list_by_owner(owner, Pagination::default(), None)
            .await
            .unwrap();
        assert_eq!(all.total_count, 5);

        let done = repo
            .list_by_owner(owner, Pagination::default(), Some(true))
            .await
            .unwrap();
        assert_eq!(done.total_count, 3);
        assert!(done.tasks.iter().all(|t| t.completed));

        let pending = repo
            .list_by_owner(owner, Pagination::new(Some(1), Some(1)).unwrap(), Some(false))
            .await
            .unwrap();
        assert_eq!(pending.total_count, 2);
        assert_eq!(pending.tasks.len(), 1);
        assert!(pending.has_next());
    }
}
