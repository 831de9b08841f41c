//!
//! # Storage Abstraction
//!
//! The persistence boundary of the application: two collections, users and
//! tasks, behind the async [`Store`] trait. The binary picks a backend at
//! startup — [`postgres::PgStore`] when `DATABASE_URL` is configured,
//! [`memory::MemoryStore`] otherwise (and throughout the test suite).
//!
//! Whatever the backend, the same guarantees hold:
//!
//! * username uniqueness is enforced atomically by the store itself (unique
//!   index in Postgres, check-and-insert under one write lock in memory), so
//!   concurrent signups with the same name cannot both succeed;
//! * individual document writes are atomic; there is no cross-document
//!   transaction and no enforced referential integrity — a task whose creator
//!   has vanished simply populates to a `null` creator.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{PopulatedTask, Task, TaskStatus, TaskUpdate, User};

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The username uniqueness constraint was violated on insert.
    #[error("username {0:?} is already taken")]
    UsernameTaken(String),

    /// Any other database-level failure. Surfaced to clients as a generic
    /// 500; the detail stays in the server log.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Filter applied by [`Store::list_tasks`]. All criteria are ANDed.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Keep only tasks with this status.
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring match against title, description, or
    /// category.
    pub search: Option<String>,
    /// Keep only tasks created by this user. Set by the handlers when the
    /// private visibility policy is active; `None` means system-wide.
    pub creator: Option<Uuid>,
}

/// Persistence operations for users and tasks.
///
/// Listing returns [`PopulatedTask`]s — the creator reference is resolved by
/// the backend (a `LEFT JOIN` in Postgres, a map lookup in memory). The
/// single-task operations deal in raw [`Task`]s; handlers populate those with
/// a separate user lookup when building a response.
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a new user. Fails with [`StoreError::UsernameTaken`] if the
    /// username already exists; the check and the insert are one atomic step.
    async fn insert_user(&self, user: User) -> Result<(), StoreError>;

    /// Exact, case-sensitive username lookup.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn insert_task(&self, task: Task) -> Result<(), StoreError>;

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Returns the complete filtered set, newest first. No pagination happens
    /// here: the presentation layer pages client-side, and the API contract
    /// is the full match set.
    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<PopulatedTask>, StoreError>;

    /// Overlays `update` onto the stored task. Returns `Ok(None)` when the id
    /// does not exist.
    async fn update_task(&self, id: Uuid, update: TaskUpdate)
        -> Result<Option<Task>, StoreError>;

    /// Removes a task. Returns `Ok(false)` when the id does not exist, which
    /// makes a repeated delete a clean miss rather than an error.
    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// True when `task` matches every criterion in `filter`. Shared by the
/// in-memory backend; the Postgres backend expresses the same predicate in
/// SQL.
pub(crate) fn matches_filter(task: &Task, filter: &TaskFilter) -> bool {
    if let Some(status) = filter.status {
        if task.status != status {
            return false;
        }
    }
    if let Some(creator) = filter.creator {
        if task.creator != creator {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let hit = task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
            || task.category.to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }
    true
}
