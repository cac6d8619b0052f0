//! Reducer logic for the todo list.
//!
//! Commands mutate [`TodoState`] directly and announce their outcome through
//! a single emitted event. Events are notifications for waiting callers and
//! leave state untouched when fed back.

use crate::types::{TodoAction, TodoState};
use todo_app_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Environment dependencies for the Todo reducer
///
/// The todo list has no external dependencies; the id counter lives in state.
#[derive(Clone, Debug, Default)]
pub struct TodoEnvironment;

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::CreateTodo {
                correlation_id,
                title,
            } => {
                let outcome = match state.insert(title) {
                    Some(item) => {
                        tracing::debug!(todo_id = %item.id, "Todo created");
                        TodoAction::TodoCreated {
                            correlation_id,
                            item,
                        }
                    },
                    None => {
                        tracing::warn!("Todo ids exhausted, create refused");
                        TodoAction::IdsExhausted { correlation_id }
                    },
                };

                smallvec![Effect::emit(outcome)]
            },

            TodoAction::UpdateTodo {
                correlation_id,
                id,
                title,
                is_complete,
            } => {
                let outcome = match state.update(id, title, is_complete) {
                    Some(item) => {
                        tracing::debug!(todo_id = %id, is_complete, "Todo updated");
                        TodoAction::TodoUpdated {
                            correlation_id,
                            item: item.clone(),
                        }
                    },
                    None => TodoAction::TodoNotFound { correlation_id, id },
                };

                smallvec![Effect::emit(outcome)]
            },

            TodoAction::DeleteTodo { correlation_id, id } => {
                let outcome = if state.remove(id).is_some() {
                    tracing::debug!(todo_id = %id, "Todo deleted");
                    TodoAction::TodoDeleted { correlation_id, id }
                } else {
                    TodoAction::TodoNotFound { correlation_id, id }
                };

                smallvec![Effect::emit(outcome)]
            },

            // ========== Events ==========
            TodoAction::TodoCreated { .. }
            | TodoAction::TodoUpdated { .. }
            | TodoAction::TodoDeleted { .. }
            | TodoAction::TodoNotFound { .. }
            | TodoAction::IdsExhausted { .. } => SmallVec::new(),
        }
    }
}
