use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{Task, TaskStatus, User};

/// In-process store holding users and tasks behind a lock.
///
/// Tasks are kept in insertion order so that ties on `created_at` still list newest first.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exists".into()));
        }
        users.push(user.clone());
        Ok(user.clone())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        tasks.push(task.clone());
        Ok(task.clone())
    }

    async fn update(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        let existing = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        existing.title = task.title.clone();
        existing.description = task.description.clone();
        existing.status = task.status;
        existing.file_path = task.file_path.clone();
        Ok(existing.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() != before)
    }

    async fn count_by_status(&self, user_id: Uuid) -> Result<Vec<(TaskStatus, i64)>, AppError> {
        let tasks = self.tasks.read().await;
        let mut counts: BTreeMap<TaskStatus, i64> = BTreeMap::new();
        for task in tasks.iter().filter(|t| t.user_id == user_id) {
            *counts.entry(task.status).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}
