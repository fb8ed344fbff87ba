// rest/routes/todos.rs — Collection and item routes for the task store.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::store::{Task, TaskDraft};
use crate::AppContext;

/// GET /api/v1/todos — the full sequence, insertion order.
pub async fn list_todos(State(ctx): State<Arc<AppContext>>) -> Json<Vec<Task>> {
    Json(ctx.store.list().await)
}

/// POST /api/v1/todos — append a task; mints an id when the body has none.
pub async fn create_todo(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<TaskDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(draft) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let task = ctx.store.create(draft).await?;
    info!(id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/v1/todos/{id} — wholesale replacement of one task.
///
/// The path id is authoritative; a body id, when present, must match it.
pub async fn replace_todo(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
    payload: Result<Json<TaskDraft>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(draft) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if let Some(body_id) = draft.id {
        if body_id != id {
            return Err(ApiError::BadRequest(format!(
                "body id {body_id} does not match path id {id}"
            )));
        }
    }
    let task = ctx.store.replace(id, draft).await?;
    Ok(Json(task))
}

/// DELETE /api/v1/todos/{id} — remove one task.
pub async fn delete_todo(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    ctx.store.remove(id).await?;
    info!(id, "task deleted");
    Ok(Json(json!({ "message": format!("task {id} deleted") })))
}
