//! In-memory storage backend.
//!
//! Backs the test suite and serves as the fallback when no `DATABASE_URL` is
//! configured. Data lives for the lifetime of the process only.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{PopulatedTask, Task, TaskUpdate, User};
use crate::store::{matches_filter, Store, StoreError, TaskFilter};

/// Process-local store: one `RwLock`ed map per collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<(), StoreError> {
        // Uniqueness check and insert happen under the same write lock, so
        // two concurrent signups with the same username cannot both pass.
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::UsernameTaken(user.username));
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn insert_task(&self, task: Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task);
        Ok(())
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<PopulatedTask>, StoreError> {
        let tasks = self.tasks.read().await;
        let users = self.users.read().await;

        let mut matched: Vec<Task> = tasks
            .values()
            .filter(|task| matches_filter(task, &filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matched
            .into_iter()
            .map(|task| {
                let creator = users.get(&task.creator).map(|u| u.public());
                task.populate(creator)
            })
            .collect())
    }

    async fn update_task(
        &self,
        id: Uuid,
        update: TaskUpdate,
    ) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&id) {
            Some(task) => {
                update.apply(task);
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskInput, TaskStatus};

    fn seed_user(name: &str) -> User {
        User::new(name.to_string(), format!("hash-of-{}", name))
    }

    fn seed_task(title: &str, description: &str, category: &str, creator: Uuid) -> Task {
        Task::new(
            TaskInput {
                title: title.to_string(),
                description: description.to_string(),
                status: None,
                is_important: None,
                category: Some(category.to_string()),
            },
            creator,
        )
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        store.insert_user(seed_user("alice")).await.unwrap();

        let second = store.insert_user(seed_user("alice")).await;
        assert!(matches!(second, Err(StoreError::UsernameTaken(name)) if name == "alice"));

        // Lookup is case-sensitive: "Alice" is a different name.
        assert!(store
            .find_user_by_username("Alice")
            .await
            .unwrap()
            .is_none());
        store.insert_user(seed_user("Alice")).await.unwrap();
    }

    #[tokio::test]
    async fn test_status_filter_returns_only_matching() {
        let store = MemoryStore::new();
        let alice = seed_user("alice");
        let alice_id = alice.id;
        store.insert_user(alice).await.unwrap();

        let mut done = seed_task("done task", "d", "General", alice_id);
        done.status = TaskStatus::Done;
        store.insert_task(done).await.unwrap();
        store
            .insert_task(seed_task("open task", "d", "General", alice_id))
            .await
            .unwrap();

        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        let tasks = store.list_tasks(filter).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "done task");
        assert_eq!(tasks[0].status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_across_fields() {
        let store = MemoryStore::new();
        let creator = Uuid::new_v4();
        store
            .insert_task(seed_task("pay bills", "monthly", "Urgent errands", creator))
            .await
            .unwrap();
        store
            .insert_task(seed_task("water plants", "balcony", "Home", creator))
            .await
            .unwrap();

        let filter = TaskFilter {
            search: Some("urgent".to_string()),
            ..Default::default()
        };
        let tasks = store.list_tasks(filter).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "pay bills");
    }

    #[tokio::test]
    async fn test_status_and_search_are_anded() {
        let store = MemoryStore::new();
        let creator = Uuid::new_v4();
        let mut done = seed_task("report alpha", "d", "Work", creator);
        done.status = TaskStatus::Done;
        store.insert_task(done).await.unwrap();
        store
            .insert_task(seed_task("report beta", "d", "Work", creator))
            .await
            .unwrap();

        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            search: Some("report".to_string()),
            ..Default::default()
        };
        let tasks = store.list_tasks(filter).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "report alpha");
    }

    #[tokio::test]
    async fn test_listing_is_newest_first() {
        let store = MemoryStore::new();
        let creator = Uuid::new_v4();
        for title in ["first", "second", "third"] {
            let mut task = seed_task(title, "d", "General", creator);
            // Spread the timestamps so the ordering is deterministic.
            task.created_at = chrono::Utc::now()
                + chrono::Duration::seconds(match title {
                    "first" => 0,
                    "second" => 1,
                    _ => 2,
                });
            store.insert_task(task).await.unwrap();
        }

        let tasks = store.list_tasks(TaskFilter::default()).await.unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_dangling_creator_populates_to_null() {
        let store = MemoryStore::new();
        // No matching user record exists for this creator id.
        store
            .insert_task(seed_task("orphan", "d", "General", Uuid::new_v4()))
            .await
            .unwrap();

        let tasks = store.list_tasks(TaskFilter::default()).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].creator.is_none());
    }

    #[tokio::test]
    async fn test_creator_scoped_listing() {
        let store = MemoryStore::new();
        let alice = seed_user("alice");
        let bob = seed_user("bob");
        let (alice_id, bob_id) = (alice.id, bob.id);
        store.insert_user(alice).await.unwrap();
        store.insert_user(bob).await.unwrap();

        store
            .insert_task(seed_task("alice task", "d", "General", alice_id))
            .await
            .unwrap();
        store
            .insert_task(seed_task("bob task", "d", "General", bob_id))
            .await
            .unwrap();

        let filter = TaskFilter {
            creator: Some(alice_id),
            ..Default::default()
        };
        let tasks = store.list_tasks(filter).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "alice task");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_ids() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();

        let updated = store
            .update_task(missing, TaskUpdate::default())
            .await
            .unwrap();
        assert!(updated.is_none());

        assert!(!store.delete_task(missing).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_single_shot() {
        let store = MemoryStore::new();
        let task = seed_task("ephemeral", "d", "General", Uuid::new_v4());
        let id = task.id;
        store.insert_task(task).await.unwrap();

        assert!(store.delete_task(id).await.unwrap());
        assert!(!store.delete_task(id).await.unwrap());
    }
}
