/// Task endpoints
///
/// # Endpoints
///
/// - `POST /api/tasks` - create a task owned by the caller
/// - `GET /api/tasks?status=&search=` - the caller's tasks
/// - `GET /api/tasks/:id` - one task, if the caller owns it
/// - `PUT /api/tasks/:id` - partial update, owner only
/// - `DELETE /api/tasks/:id` - delete, owner only
///
/// Every by-id operation fetches first and then runs the ownership
/// guard, so a foreign task answers 403 and a missing one 404.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::ownership::{ensure_owner, TaskAction},
    models::{
        task::{CreateTask, Task, TaskStatus, UpdateTask},
        user::PublicUser,
    },
};
use uuid::Uuid;

/// Create request; `title` is required, the rest optional
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// One of `todo`, `in-progress`, `done`; defaults to `todo`
    pub status: Option<String>,
}

/// Update request; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Query parameters for listing
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// Status filter; `all` or absent means no filter
    pub status: Option<String>,

    /// Case-insensitive match over title and description
    pub search: Option<String>,
}

/// Delete confirmation body
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Checks the title/status shape rules shared by create and update
///
/// `title_required` distinguishes create (title must be present) from
/// update (title may be absent but not blank).
fn validate_task_input(
    title: Option<&str>,
    status: Option<&str>,
    title_required: bool,
) -> Result<Option<TaskStatus>, Vec<String>> {
    let mut errors = Vec::new();

    match title {
        Some(t) if t.trim().is_empty() => errors.push("Task title is required".to_string()),
        None if title_required => errors.push("Task title is required".to_string()),
        _ => {}
    }

    let status = match status {
        Some(s) => match TaskStatus::parse(s) {
            Some(parsed) => Some(parsed),
            None => {
                errors.push("Invalid status value".to_string());
                None
            }
        },
        None => None,
    };

    if errors.is_empty() {
        Ok(status)
    } else {
        Err(errors)
    }
}

/// Creates a task owned by the caller
///
/// Status defaults to `todo`. The owner is the authenticated identity;
/// the request body cannot set it.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let status = validate_task_input(req.title.as_deref(), req.status.as_deref(), true)
        .map_err(ApiError::ValidationFailed)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title.unwrap_or_default().trim().to_string(),
            description: req.description,
            status: status.unwrap_or_default(),
            owner_id: user.id,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, owner_id = %user.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists the caller's tasks, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let status = match query.status.as_deref() {
        None | Some("all") | Some("") => None,
        Some(s) => Some(
            TaskStatus::parse(s)
                .ok_or_else(|| ApiError::ValidationFailed(vec!["Invalid status value".to_string()]))?,
        ),
    };

    let search = query.search.as_deref().filter(|s| !s.is_empty());

    let tasks = Task::list_for_owner(&state.db, user.id, status, search).await?;

    Ok(Json(tasks))
}

/// Returns one task by id, owner only
pub async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let fetched = Task::find_by_id(&state.db, id).await?;
    let task = ensure_owner(user.id, fetched, TaskAction::View)?;

    Ok(Json(task))
}

/// Applies a partial update to a task, owner only
///
/// Last write wins between concurrent updates; there is no version
/// field on tasks.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let fetched = Task::find_by_id(&state.db, id).await?;
    let task = ensure_owner(user.id, fetched, TaskAction::Update)?;

    let status = validate_task_input(req.title.as_deref(), req.status.as_deref(), false)
        .map_err(ApiError::ValidationFailed)?;

    let updated = Task::update(
        &state.db,
        task.id,
        UpdateTask {
            title: req.title.map(|t| t.trim().to_string()),
            description: req.description,
            status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(task_id = %updated.id, "Task updated");

    Ok(Json(updated))
}

/// Deletes a task, owner only
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let fetched = Task::find_by_id(&state.db, id).await?;
    let task = ensure_owner(user.id, fetched, TaskAction::Delete)?;

    Task::delete(&state.db, task.id).await?;

    tracing::info!(task_id = %task.id, "Task removed");

    Ok(Json(DeleteResponse {
        message: "Task removed".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_title() {
        let errors = validate_task_input(None, None, true).unwrap_err();
        assert_eq!(errors, vec!["Task title is required".to_string()]);
    }

    #[test]
    fn test_blank_title_rejected() {
        let errors = validate_task_input(Some("   "), None, true).unwrap_err();
        assert_eq!(errors, vec!["Task title is required".to_string()]);

        // On update a blank title is still an error even though the
        // field itself is optional.
        let errors = validate_task_input(Some(""), None, false).unwrap_err();
        assert_eq!(errors, vec!["Task title is required".to_string()]);
    }

    #[test]
    fn test_update_title_may_be_absent() {
        assert_eq!(validate_task_input(None, None, false), Ok(None));
    }

    #[test]
    fn test_status_outside_enumeration_rejected() {
        let errors = validate_task_input(Some("Buy milk"), Some("archived"), true).unwrap_err();
        assert_eq!(errors, vec!["Invalid status value".to_string()]);
    }

    #[test]
    fn test_valid_status_parses() {
        assert_eq!(
            validate_task_input(Some("Buy milk"), Some("in-progress"), true),
            Ok(Some(TaskStatus::InProgress))
        );
        assert_eq!(validate_task_input(Some("Buy milk"), None, true), Ok(None));
    }

    #[test]
    fn test_both_errors_reported_together() {
        let errors = validate_task_input(Some(""), Some("bogus"), true).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&"Task title is required".to_string()));
        assert!(errors.contains(&"Invalid status value".to_string()));
    }
}
