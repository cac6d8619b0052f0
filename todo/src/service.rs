//! Async facade over the todo [`Store`].
//!
//! Reads go straight to state. Writes are dispatched as commands tagged
//! with a fresh correlation id, and the service waits for the matching
//! outcome event.

use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{TitleError, TodoAction, TodoId, TodoItem, TodoState, TodoTitle};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use todo_app_runtime::{Store, StoreError};
use uuid::Uuid;

/// The runtime store specialised to the todo list
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Errors returned by [`TodoService`]
#[derive(Debug, Error)]
pub enum TodoError {
    /// The title was missing or blank
    #[error(transparent)]
    Validation(#[from] TitleError),

    /// No todo has this id
    #[error("Todo {0} not found")]
    NotFound(TodoId),

    /// The store rejected the command or no outcome arrived in time
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Every todo id has been handed out
    #[error("No todo ids left")]
    IdsExhausted,

    /// A command was answered by an event of the wrong kind
    #[error("Unexpected outcome for {0} command")]
    UnexpectedOutcome(&'static str),
}

/// Todo list operations over a shared store
#[derive(Clone)]
pub struct TodoService {
    store: Arc<TodoStore>,
    timeout: Duration,
}

impl TodoService {
    /// Wraps a store; `timeout` bounds the wait for each command outcome
    #[must_use]
    pub const fn new(store: Arc<TodoStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &Arc<TodoStore> {
        &self.store
    }

    /// All todos in insertion order
    pub async fn list_all(&self) -> Vec<TodoItem> {
        self.store.state(|s| s.list().cloned().collect()).await
    }

    /// Looks up one todo
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if no todo has this id.
    pub async fn get_by_id(&self, id: TodoId) -> Result<TodoItem, TodoError> {
        self.store
            .state(|s| s.get(id).cloned())
            .await
            .ok_or(TodoError::NotFound(id))
    }

    /// Creates an incomplete todo under the next free id
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Store`] if the store is shutting down or the
    /// outcome does not arrive in time, and [`TodoError::IdsExhausted`] if
    /// no unused id is left.
    #[tracing::instrument(skip(self, title))]
    pub async fn insert(&self, title: TodoTitle) -> Result<TodoItem, TodoError> {
        let outcome = self
            .dispatch(|correlation_id| TodoAction::CreateTodo {
                correlation_id,
                title,
            })
            .await?;

        match outcome {
            TodoAction::TodoCreated { item, .. } => {
                tracing::info!(todo_id = %item.id, "Todo created");
                Ok(item)
            },
            TodoAction::IdsExhausted { .. } => Err(TodoError::IdsExhausted),
            _ => Err(TodoError::UnexpectedOutcome("create")),
        }
    }

    /// Replaces the title and completion flag of a todo
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if no todo has this id, or
    /// [`TodoError::Store`] if the command could not complete.
    #[tracing::instrument(skip(self, title))]
    pub async fn update(
        &self,
        id: TodoId,
        title: TodoTitle,
        is_complete: bool,
    ) -> Result<TodoItem, TodoError> {
        let outcome = self
            .dispatch(|correlation_id| TodoAction::UpdateTodo {
                correlation_id,
                id,
                title,
                is_complete,
            })
            .await?;

        match outcome {
            TodoAction::TodoUpdated { item, .. } => {
                tracing::info!(todo_id = %id, "Todo updated");
                Ok(item)
            },
            TodoAction::TodoNotFound { id, .. } => Err(TodoError::NotFound(id)),
            _ => Err(TodoError::UnexpectedOutcome("update")),
        }
    }

    /// Deletes a todo; its id is never handed out again
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if no todo has this id, or
    /// [`TodoError::Store`] if the command could not complete.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        let outcome = self
            .dispatch(|correlation_id| TodoAction::DeleteTodo { correlation_id, id })
            .await?;

        match outcome {
            TodoAction::TodoDeleted { .. } => {
                tracing::info!(todo_id = %id, "Todo deleted");
                Ok(())
            },
            TodoAction::TodoNotFound { id, .. } => Err(TodoError::NotFound(id)),
            _ => Err(TodoError::UnexpectedOutcome("delete")),
        }
    }

    async fn dispatch(
        &self,
        command: impl FnOnce(Uuid) -> TodoAction,
    ) -> Result<TodoAction, TodoError> {
        let correlation_id = Uuid::new_v4();

        let outcome = self
            .store
            .send_and_wait_for(
                command(correlation_id),
                move |action| action.is_event() && action.correlation_id() == correlation_id,
                self.timeout,
            )
            .await?;

        Ok(outcome)
    }
}
