//! Persistence seams for users and tasks.
//!
//! Services only talk to these traits. `postgres` backs them with `sqlx` in production,
//! `memory` keeps everything in process and is what the test suite runs against.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskStatus, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Persists a new user. Fails with `AppError::Conflict` if the email is taken.
    async fn insert(&self, user: &User) -> Result<User, AppError>;
}

/// Task store. Ownership checks are the caller's job; the store works by id.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    async fn insert(&self, task: &Task) -> Result<Task, AppError>;

    /// Overwrites the mutable columns (title, description, status, file path) of an existing task.
    async fn update(&self, task: &Task) -> Result<Task, AppError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Number of tasks per status for one user. Statuses without tasks are not returned.
    async fn count_by_status(&self, user_id: Uuid) -> Result<Vec<(TaskStatus, i64)>, AppError>;
}
