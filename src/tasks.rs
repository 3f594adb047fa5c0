//! Ownership-scoped task operations.
//!
//! Every operation on an existing task first loads it, answers `NotFound` if it is absent and
//! `Forbidden` if the caller is not its owner, and only then looks at the request content.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{CreateTaskRequest, Task, TaskStatus, UpdateTaskRequest};
use crate::store::TaskStore;
use crate::uploads::{AttachmentStorage, UploadedFile};

pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    attachments: AttachmentStorage,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>, attachments: AttachmentStorage) -> Self {
        Self { tasks, attachments }
    }

    pub fn attachments(&self) -> &AttachmentStorage {
        &self.attachments
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Task>, AppError> {
        debug!("Listing tasks for user {}", user_id);
        self.tasks.list_for_user(user_id).await
    }

    pub async fn get(&self, user_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
        self.owned_task(user_id, task_id, "access").await
    }

    pub async fn create(&self, user_id: Uuid, request: CreateTaskRequest) -> Result<Task, AppError> {
        request.validate()?;
        let status = match request.status.as_deref() {
            Some(raw) => raw.parse()?,
            None => TaskStatus::default(),
        };

        let task = Task::new(user_id, request.title, request.description, status);
        let task = self.tasks.insert(&task).await?;
        info!("User {} created task {}", user_id, task.id);
        Ok(task)
    }

    /// Applies the provided fields of `patch`.
    ///
    /// An empty string counts as "not provided" for every field, so a title cannot be
    /// cleared through this call.
    pub async fn update(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: UpdateTaskRequest,
    ) -> Result<Task, AppError> {
        let mut task = self.owned_task(user_id, task_id, "update").await?;

        let status = match non_empty(patch.status) {
            Some(raw) => Some(raw.parse::<TaskStatus>()?),
            None => None,
        };
        if let Some(title) = non_empty(patch.title) {
            task.title = title;
        }
        if let Some(description) = non_empty(patch.description) {
            task.description = Some(description);
        }
        if let Some(status) = status {
            task.status = status;
        }

        let task = self.tasks.update(&task).await?;
        info!("User {} updated task {}", user_id, task.id);
        Ok(task)
    }

    pub async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
        let task = self.owned_task(user_id, task_id, "delete").await?;

        if !self.tasks.delete(task.id).await? {
            return Err(AppError::NotFound("Task not found".into()));
        }
        if let Some(path) = task.file_path.as_deref() {
            self.attachments.remove(path).await;
        }

        info!("User {} deleted task {}", user_id, task_id);
        Ok(())
    }

    /// Stores `file` as the task's attachment and returns its path. A previous
    /// attachment is unlinked once the new one is recorded.
    pub async fn attach(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        file: &UploadedFile,
    ) -> Result<String, AppError> {
        let mut task = self.owned_task(user_id, task_id, "upload to").await?;

        let path = self.attachments.save(file).await?;
        let previous = task.file_path.replace(path.clone());
        if let Err(e) = self.tasks.update(&task).await {
            self.attachments.remove(&path).await;
            return Err(e);
        }
        if let Some(previous) = previous.filter(|p| *p != path) {
            self.attachments.remove(&previous).await;
        }

        info!("User {} attached {} to task {}", user_id, path, task_id);
        Ok(path)
    }

    /// Count of the user's tasks per status. Statuses with no tasks are left out.
    pub async fn stats(&self, user_id: Uuid) -> Result<BTreeMap<TaskStatus, i64>, AppError> {
        let counts = self.tasks.count_by_status(user_id).await?;
        Ok(counts.into_iter().filter(|(_, n)| *n > 0).collect())
    }

    async fn owned_task(&self, user_id: Uuid, task_id: Uuid, action: &str) -> Result<Task, AppError> {
        let task = self
            .tasks
            .find(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        if task.user_id != user_id {
            return Err(AppError::Forbidden(format!(
                "Unauthorized to {} this task",
                action
            )));
        }
        Ok(task)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
