/// Task ownership guard
///
/// Applied after a handler fetches a task by id, before any read or
/// mutation. The guard is deliberately a separate step from the fetch:
/// a task can be fetched by id independent of the caller, so owner
/// scoping in the query alone would not cover direct-id access, and
/// folding the check into the query would collapse "exists but
/// forbidden" into "does not exist".
///
/// An absent task is `NotFound`; another user's task is `Forbidden`.
/// This reveals that the task exists while denying access. Masking the
/// `Forbidden` case as `NotFound` would hide existence at the cost of
/// less accurate client feedback; this implementation keeps the two
/// distinct.
///
/// The guard is pure and stateless.

use uuid::Uuid;

use crate::models::task::Task;

/// What the caller is about to do with the task; only used for the
/// rejection message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    View,
    Update,
    Delete,
}

impl TaskAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskAction::View => "view",
            TaskAction::Update => "update",
            TaskAction::Delete => "delete",
        }
    }
}

impl std::fmt::Display for TaskAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guard verdict when the task cannot be released to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OwnershipError {
    /// No task with that id exists
    #[error("Task not found")]
    NotFound,

    /// The task exists but belongs to someone else
    #[error("Not authorized to {action} this task")]
    Forbidden { action: TaskAction },
}

/// Enforces that the fetched task belongs to the authenticated caller
///
/// Returns the task unchanged when the caller owns it.
pub fn ensure_owner(
    user_id: Uuid,
    task: Option<Task>,
    action: TaskAction,
) -> Result<Task, OwnershipError> {
    let task = task.ok_or(OwnershipError::NotFound)?;

    if task.owner_id != user_id {
        return Err(OwnershipError::Forbidden { action });
    }

    Ok(task)
}
