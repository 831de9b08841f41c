//! Postgres storage backend.
//!
//! Queries are built at runtime (no compile-time macro checking) so the crate
//! builds without a live database. Username uniqueness rides on the unique
//! index declared in the migrations: the insert uses `ON CONFLICT DO NOTHING`
//! and treats zero affected rows as a taken name, which closes the
//! check-then-insert race for good.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{PopulatedTask, PublicUser, Task, TaskStatus, TaskUpdate, User};
use crate::store::{Store, StoreError, TaskFilter};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// One row of the task listing: the task columns plus the creator columns
/// from the `LEFT JOIN`, which are NULL for a dangling reference.
#[derive(FromRow)]
struct PopulatedTaskRow {
    id: Uuid,
    title: String,
    description: String,
    status: TaskStatus,
    is_important: bool,
    category: String,
    created_at: chrono::DateTime<chrono::Utc>,
    creator_id: Option<Uuid>,
    creator_username: Option<String>,
}

impl From<PopulatedTaskRow> for PopulatedTask {
    fn from(row: PopulatedTaskRow) -> Self {
        let creator = match (row.creator_id, row.creator_username) {
            (Some(id), Some(username)) => Some(PublicUser { id, username }),
            _ => None,
        };
        PopulatedTask {
            id: row.id,
            creator,
            title: row.title,
            description: row.description,
            status: row.status,
            is_important: row.is_important,
            category: row.category,
            created_at: row.created_at,
        }
    }
}

const TASK_COLUMNS: &str = "id, creator, title, description, status, is_important, category, created_at";

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UsernameTaken(user.username));
        }
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_task(&self, task: Task) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO tasks (id, creator, title, description, status, is_important, category, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(task.id)
        .bind(task.creator)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.is_important)
        .bind(&task.category)
        .bind(task.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<PopulatedTask>, StoreError> {
        // Base listing with the creator resolved in the same round trip.
        // Filter conditions are appended dynamically, in bind order.
        let mut sql = String::from(
            "SELECT t.id, t.title, t.description, t.status, t.is_important, t.category, \
             t.created_at, u.id AS creator_id, u.username AS creator_username \
             FROM tasks t LEFT JOIN users u ON u.id = t.creator",
        );

        let mut conditions: Vec<String> = Vec::new();
        let mut param_count = 1;

        if filter.status.is_some() {
            conditions.push(format!("t.status = ${}", param_count));
            param_count += 1;
        }
        if filter.creator.is_some() {
            conditions.push(format!("t.creator = ${}", param_count));
            param_count += 1;
        }
        if filter.search.is_some() {
            conditions.push(format!(
                "(t.title ILIKE ${0} OR t.description ILIKE ${0} OR t.category ILIKE ${0})",
                param_count
            ));
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY t.created_at DESC");

        let mut query = sqlx::query_as::<_, PopulatedTaskRow>(&sql);
        if let Some(status) = filter.status {
            query = query.bind(status);
        }
        if let Some(creator) = filter.creator {
            query = query.bind(creator);
        }
        if let Some(search) = &filter.search {
            query = query.bind(format!("%{}%", search));
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(PopulatedTask::from).collect())
    }

    async fn update_task(
        &self,
        id: Uuid,
        update: TaskUpdate,
    ) -> Result<Option<Task>, StoreError> {
        // COALESCE keeps the stored value wherever the payload omitted the
        // field; creator and created_at are not in the SET list at all.
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET
                 title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 status = COALESCE($4, status),
                 is_important = COALESCE($5, is_important),
                 category = COALESCE($6, category)
             WHERE id = $1
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(update.title)
        .bind(update.description)
        .bind(update.status)
        .bind(update.is_important)
        .bind(update.category)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
