//! Todo HTTP endpoints.
//!
//! - GET /api/todos - List all todos
//! - GET /api/todos/:id - Get one todo
//! - POST /api/todos - Create a todo
//! - PUT /api/todos/:id - Replace title and completion flag
//! - DELETE /api/todos/:id - Delete a todo

use crate::service::{TodoError, TodoService};
use crate::types::{TodoId, TodoItem, TodoTitle};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use todo_app_runtime::StoreError;
use todo_app_web::{AppError, WebResult};

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /api/todos`.
///
/// Any client-supplied `id` is ignored, and so is `isComplete`: new todos
/// always start incomplete.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateTodoRequest {
    /// Todo title
    pub title: Option<String>,
    /// Accepted for compatibility and ignored
    pub is_complete: Option<bool>,
}

/// Body of `PUT /api/todos/:id`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    /// Replacement title
    pub title: Option<String>,
    /// Replacement completion flag, false when omitted
    pub is_complete: bool,
}

// ============================================================================
// Error Mapping
// ============================================================================

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::Validation(e) => Self::validation(e.to_string()),
            TodoError::NotFound(id) => Self::not_found("Todo", id),
            TodoError::Store(
                e @ (StoreError::Timeout
                | StoreError::ShutdownInProgress
                | StoreError::ChannelClosed),
            ) => Self::unavailable("Todo store is unavailable").with_source(e.into()),
            e @ (TodoError::Store(_)
            | TodoError::IdsExhausted
            | TodoError::UnexpectedOutcome(_)) => {
                Self::internal("An internal error occurred").with_source(e.into())
            },
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// List all todos in insertion order.
///
/// ```text
/// GET /api/todos
/// ```
pub async fn list_todos(State(todos): State<TodoService>) -> Json<Vec<TodoItem>> {
    Json(todos.list_all().await)
}

/// Get a single todo.
///
/// ```text
/// GET /api/todos/:id
/// ```
///
/// # Errors
///
/// 404 with an empty body if the id does not exist.
pub async fn get_todo(
    State(todos): State<TodoService>,
    Path(id): Path<TodoId>,
) -> WebResult<Json<TodoItem>> {
    Ok(Json(todos.get_by_id(id).await?))
}

/// Create a todo.
///
/// ```text
/// POST /api/todos
/// {"title": "Buy milk"}
/// ```
///
/// Responds 201 with a `Location` header pointing at the new item.
///
/// # Errors
///
/// 400 if the title is missing or blank.
pub async fn create_todo(
    State(todos): State<TodoService>,
    Json(request): Json<CreateTodoRequest>,
) -> WebResult<impl IntoResponse> {
    let title = TodoTitle::from_optional(request.title).map_err(TodoError::from)?;

    let item = todos.insert(title).await?;
    let location = format!("/api/todos/{}", item.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(item)))
}

/// Replace a todo's title and completion flag.
///
/// ```text
/// PUT /api/todos/:id
/// {"title": "Buy oat milk", "isComplete": true}
/// ```
///
/// # Errors
///
/// 400 if the title is missing or blank, checked before the id is looked
/// up. 404 if the id does not exist.
pub async fn update_todo(
    State(todos): State<TodoService>,
    Path(id): Path<TodoId>,
    Json(request): Json<UpdateTodoRequest>,
) -> WebResult<Json<TodoItem>> {
    let title = TodoTitle::from_optional(request.title).map_err(TodoError::from)?;

    Ok(Json(todos.update(id, title, request.is_complete).await?))
}

/// Delete a todo.
///
/// ```text
/// DELETE /api/todos/:id
/// ```
///
/// # Errors
///
/// 404 if the id does not exist.
pub async fn delete_todo(
    State(todos): State<TodoService>,
    Path(id): Path<TodoId>,
) -> WebResult<StatusCode> {
    todos.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
