use crate::{
    auth::Identity,
    config::TaskVisibility,
    error::AppError,
    models::{PublicUser, Task, TaskInput, TaskStatus, TaskUpdate},
    store::{Store, TaskFilter},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Raw query parameters for the task listing. `status` stays a plain string
/// here because unrecognized values are ignored, not rejected.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Lenient status parsing: only the exact strings "Pending" and "Done" count;
/// anything else behaves as if no status filter was given.
fn parse_status_param(status: Option<&str>) -> Option<TaskStatus> {
    status.and_then(|s| s.parse().ok())
}

/// Checks whether `identity` may touch `task` under the active visibility
/// policy. Under `Shared` everyone may; under `Private` a foreign task is
/// reported as missing rather than forbidden, so ids do not leak.
fn authorize_mutation(
    visibility: TaskVisibility,
    identity: &Identity,
    task: &Task,
) -> Result<(), AppError> {
    if visibility == TaskVisibility::Private && task.creator != identity.id {
        return Err(AppError::NotFound("Task not found".into()));
    }
    Ok(())
}

/// List tasks
///
/// Returns the complete filtered set, newest first — pagination is the
/// client's concern. Supports `status` (exact "Pending"/"Done", anything
/// else ignored) and `search` (case-insensitive substring over title,
/// description, and category); the two are ANDed. Every task's creator is
/// resolved to `{id, username}` or `null`.
///
/// Under the default shared visibility the caller sees all tasks system-wide;
/// under private visibility, only their own.
#[get("")]
pub async fn list_tasks(
    store: web::Data<dyn Store>,
    visibility: web::Data<TaskVisibility>,
    identity: Identity,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    // The session may outlive the user record; a dangling identity is a 404.
    let user = store
        .find_user_by_id(identity.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let filter = TaskFilter {
        status: parse_status_param(query.status.as_deref()),
        search: query.search.clone().filter(|s| !s.is_empty()),
        creator: match **visibility {
            TaskVisibility::Shared => None,
            TaskVisibility::Private => Some(user.id),
        },
    };

    let tasks = store.list_tasks(filter).await?;

    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

/// Create a new task
///
/// Title and description must be non-blank after trimming; status,
/// importance, and category fall back to Pending / false / "General". The
/// creator is the authenticated caller, resolved to a live user record.
#[post("")]
pub async fn create_task(
    store: web::Data<dyn Store>,
    identity: Identity,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate().map_err(|_| {
        AppError::ValidationError("Title and description required".into())
    })?;

    let user = store
        .find_user_by_id(identity.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let task = Task::new(task_data.into_inner(), user.id);
    store.insert_task(task.clone()).await?;

    let populated = task.populate(Some(user.public()));
    Ok(HttpResponse::Created().json(json!({
        "message": "Task created",
        "task": populated
    })))
}

/// Update a task (partial)
///
/// Overlays only the allow-listed fields onto the stored record; omitted
/// fields keep their values and a client-supplied `creator` is stripped
/// before anything touches the store. Missing id yields 404.
#[patch("/{id}")]
pub async fn update_task(
    store: web::Data<dyn Store>,
    visibility: web::Data<TaskVisibility>,
    identity: Identity,
    task_id: web::Path<Uuid>,
    update: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    let existing = store
        .get_task(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    authorize_mutation(**visibility, &identity, &existing)?;

    let updated = store
        .update_task(task_id, update.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    let creator: Option<PublicUser> = store
        .find_user_by_id(updated.creator)
        .await?
        .map(|u| u.public());

    Ok(HttpResponse::Ok().json(updated.populate(creator)))
}

/// Delete a task
///
/// Irreversible. A second delete of the same id is a clean 404, never a
/// crash.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    visibility: web::Data<TaskVisibility>,
    identity: Identity,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    let existing = store
        .get_task(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    authorize_mutation(**visibility, &identity, &existing)?;

    if !store.delete_task(task_id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted successfully"
    })))
}
