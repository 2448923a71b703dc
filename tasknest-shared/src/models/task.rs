/// Task model and database operations
///
/// Tasks belong to exactly one owner, set at creation from the
/// authenticated caller and never reassigned. The owner check itself
/// lives in [`crate::auth::ownership`]; queries here only scope listing
/// to an owner.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in-progress', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started (the default)
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl TaskStatus {
    /// String form as stored and serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    /// Parses a client-supplied status value
    ///
    /// Anything outside the fixed enumeration is `None`; callers turn
    /// that into a validation error rather than guessing.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id
    pub id: Uuid,

    /// Title, required and non-empty
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Owner, immutable after creation
    pub owner_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// The authenticated caller; set once, never updated
    pub owner_id: Uuid,
}

/// Input for a partial task update; `None` fields are left unchanged
///
/// The owner is deliberately absent: tasks are never transferred.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl Task {
    /// Inserts a new task for its owner
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, status, owner_id, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await
    }

    /// Finds a task by id, regardless of owner
    ///
    /// Fetching is intentionally not owner-scoped; the ownership guard
    /// runs on the result so that "exists but forbidden" and "does not
    /// exist" stay distinct outcomes.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, owner_id, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists an owner's tasks, newest first
    ///
    /// `status` narrows to one status; `search` matches title or
    /// description case-insensitively.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
        status: Option<TaskStatus>,
        search: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, owner_id, created_at
            FROM tasks
            WHERE owner_id = $1
              AND ($2::task_status IS NULL OR status = $2)
              AND ($3::text IS NULL
                   OR title ILIKE '%' || $3 || '%'
                   OR description ILIKE '%' || $3 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .bind(status)
        .bind(search)
        .fetch_all(pool)
        .await
    }

    /// Applies a partial update to a task
    ///
    /// Last write wins; there is no version column. Returns the updated
    /// row, or `None` if the task no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status)
            WHERE id = $1
            RETURNING id, title, description, status, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a task by id
    ///
    /// Returns whether a row was removed. Deleting an id that does not
    /// exist removes nothing, on every call.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default_is_todo() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
    }

    #[test]
    fn test_status_parse_fixed_enumeration() {
        assert_eq!(TaskStatus::parse("todo"), Some(TaskStatus::Todo));
        assert_eq!(TaskStatus::parse("in-progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("done"), Some(TaskStatus::Done));

        assert_eq!(TaskStatus::parse("DONE"), None);
        assert_eq!(TaskStatus::parse("in progress"), None);
        assert_eq!(TaskStatus::parse(""), None);
        assert_eq!(TaskStatus::parse("archived"), None);
    }

    #[test]
    fn test_status_serde_wire_format() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");

        let back: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(back, TaskStatus::InProgress);
    }

    #[test]
    fn test_update_task_never_touches_owner() {
        // Compile-time shape check: UpdateTask has no owner field, so a
        // transfer cannot be expressed.
        let update = UpdateTask {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(update.description.is_none());
        assert!(update.status.is_none());
    }
}
