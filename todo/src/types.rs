//! Domain types for the Todo service.
//!
//! A todo list is an id-ordered collection of items. Ids come from a
//! monotonic counter owned by [`TodoState`] and are never reused.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

/// Items present when the service starts with seed data enabled.
pub const SEED_TODOS: [(&str, bool); 3] = [
    ("Buy groceries", false),
    ("Walk the dog", true),
    ("Do laundry", false),
];

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Creates a `TodoId` from its integer value
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the integer value
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejection for a missing or blank title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Title is required and cannot be empty.")]
pub struct TitleError;

/// A todo title that is known to contain non-whitespace text
///
/// The original text is kept as supplied; only the blank check trims.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoTitle(String);

impl TodoTitle {
    /// Validates a title
    ///
    /// # Errors
    ///
    /// Returns [`TitleError`] if the title is empty or only whitespace.
    pub fn new(title: impl Into<String>) -> Result<Self, TitleError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TitleError);
        }
        Ok(Self(title))
    }

    /// Validates an optional title, treating absence as blank
    ///
    /// # Errors
    ///
    /// Returns [`TitleError`] if the title is missing, empty or only whitespace.
    pub fn from_optional(title: Option<String>) -> Result<Self, TitleError> {
        title.map_or(Err(TitleError), Self::new)
    }

    /// Returns the title text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TodoTitle {
    type Error = TitleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TodoTitle> for String {
    fn from(title: TodoTitle) -> Self {
        title.0
    }
}

impl std::fmt::Display for TodoTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Unique identifier, assigned by the store
    pub id: TodoId,
    /// Title of the todo
    pub title: TodoTitle,
    /// Whether the todo is done
    pub is_complete: bool,
}

/// State of the todo list
///
/// `todos` is keyed by id; because ids only grow, iteration order is
/// insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoState {
    /// All todos indexed by ID
    pub todos: BTreeMap<TodoId, TodoItem>,
    next_id: i64,
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoState {
    /// Creates an empty todo list whose first id will be 1
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Creates a todo list holding [`SEED_TODOS`] with ids 1 to 3
    #[must_use]
    pub fn seeded() -> Self {
        let mut state = Self::new();
        for (title, is_complete) in SEED_TODOS {
            if let Some(item) = state.insert(TodoTitle(title.to_string())) {
                if is_complete {
                    state.update(item.id, item.title, true);
                }
            }
        }
        state
    }

    /// Inserts a new incomplete item under the next unused id
    ///
    /// Returns `None`, leaving the list unchanged, once the id counter is
    /// exhausted.
    pub fn insert(&mut self, title: TodoTitle) -> Option<TodoItem> {
        let id = TodoId(self.next_id);
        self.next_id = self.next_id.checked_add(1)?;

        let item = TodoItem {
            id,
            title,
            is_complete: false,
        };
        self.todos.insert(id, item.clone());
        Some(item)
    }

    /// Replaces title and completion of an existing item
    ///
    /// Returns `None` when no item has this id.
    pub fn update(&mut self, id: TodoId, title: TodoTitle, is_complete: bool) -> Option<&TodoItem> {
        let item = self.todos.get_mut(&id)?;
        item.title = title;
        item.is_complete = is_complete;
        Some(item)
    }

    /// Removes an item, returning it if it existed
    pub fn remove(&mut self, id: TodoId) -> Option<TodoItem> {
        self.todos.remove(&id)
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.get(&id)
    }

    /// Iterates over all todos in insertion order
    pub fn list(&self) -> impl Iterator<Item = &TodoItem> {
        self.todos.values()
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }
}

/// Actions representing commands and their outcomes
///
/// Every action carries the correlation id of the request that caused it,
/// so a caller can wait for the outcome of its own command.
#[derive(Clone, Debug, PartialEq)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Create a new todo
    CreateTodo {
        /// Request correlation
        correlation_id: Uuid,
        /// Title of the todo
        title: TodoTitle,
    },

    /// Command: Replace title and completion of a todo
    UpdateTodo {
        /// Request correlation
        correlation_id: Uuid,
        /// Todo to update
        id: TodoId,
        /// New title
        title: TodoTitle,
        /// New completion flag
        is_complete: bool,
    },

    /// Command: Delete a todo
    DeleteTodo {
        /// Request correlation
        correlation_id: Uuid,
        /// Todo to delete
        id: TodoId,
    },

    // ========== Events ==========
    /// Event: Todo was created
    TodoCreated {
        /// Request correlation
        correlation_id: Uuid,
        /// The stored item
        item: TodoItem,
    },

    /// Event: Todo was updated
    TodoUpdated {
        /// Request correlation
        correlation_id: Uuid,
        /// The item after the update
        item: TodoItem,
    },

    /// Event: Todo was deleted
    TodoDeleted {
        /// Request correlation
        correlation_id: Uuid,
        /// The removed todo
        id: TodoId,
    },

    /// Event: Command targeted an id that does not exist
    TodoNotFound {
        /// Request correlation
        correlation_id: Uuid,
        /// The missing id
        id: TodoId,
    },

    /// Event: Create was refused because no unused id is left
    IdsExhausted {
        /// Request correlation
        correlation_id: Uuid,
    },
}

impl TodoAction {
    /// Correlation id of the request this action belongs to
    #[must_use]
    pub const fn correlation_id(&self) -> Uuid {
        match self {
            Self::CreateTodo { correlation_id, .. }
            | Self::UpdateTodo { correlation_id, .. }
            | Self::DeleteTodo { correlation_id, .. }
            | Self::TodoCreated { correlation_id, .. }
            | Self::TodoUpdated { correlation_id, .. }
            | Self::TodoDeleted { correlation_id, .. }
            | Self::TodoNotFound { correlation_id, .. }
            | Self::IdsExhausted { correlation_id } => *correlation_id,
        }
    }

    /// Returns `true` for commands (intent to change state)
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::CreateTodo { .. } | Self::UpdateTodo { .. } | Self::DeleteTodo { .. }
        )
    }

    /// Returns `true` for events (outcomes of commands)
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn title(text: &str) -> TodoTitle {
        TodoTitle::new(text).unwrap()
    }

    #[test]
    fn todo_id_display() {
        assert_eq!(TodoId::new(42).to_string(), "42");
    }

    #[test]
    fn title_keeps_original_text() {
        assert_eq!(title("  Buy milk ").as_str(), "  Buy milk ");
    }

    #[test]
    fn title_rejects_blank_and_missing() {
        assert_eq!(TodoTitle::new(""), Err(TitleError));
        assert_eq!(TodoTitle::new(" \t\n"), Err(TitleError));
        assert_eq!(TodoTitle::from_optional(None), Err(TitleError));
        assert_eq!(TitleError.to_string(), "Title is required and cannot be empty.");
    }

    #[test]
    fn todo_item_json_shape() {
        let item = TodoItem {
            id: TodoId::new(1),
            title: title("Buy groceries"),
            is_complete: false,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "title": "Buy groceries", "isComplete": false})
        );
    }

    #[test]
    fn todo_item_rejects_blank_title_on_deserialize() {
        let result: Result<TodoItem, _> =
            serde_json::from_str(r#"{"id": 1, "title": "  ", "isComplete": false}"#);
        assert!(result.is_err());
    }

    #[test]
    fn seeded_state_matches_seed_list() {
        let state = TodoState::seeded();

        let items: Vec<_> = state
            .list()
            .map(|t| (t.id.get(), t.title.as_str(), t.is_complete))
            .collect();
        assert_eq!(
            items,
            vec![
                (1, "Buy groceries", false),
                (2, "Walk the dog", true),
                (3, "Do laundry", false),
            ]
        );

        let mut state = state;
        assert_eq!(state.insert(title("Next")).unwrap().id, TodoId::new(4));
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let mut state = TodoState::new();
        let first = state.insert(title("First")).unwrap();
        let second = state.insert(title("Second")).unwrap();

        assert_eq!(first.id, TodoId::new(1));
        assert_eq!(second.id, TodoId::new(2));
        assert!(!first.is_complete);
        assert_eq!(state.count(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut state = TodoState::new();
        let first = state.insert(title("First")).unwrap();
        assert!(state.remove(first.id).is_some());

        let second = state.insert(title("Second")).unwrap();
        assert_eq!(second.id, TodoId::new(2));
        assert!(state.get(first.id).is_none());
    }

    #[test]
    fn insert_refuses_once_ids_run_out() {
        let mut state = TodoState {
            todos: BTreeMap::new(),
            next_id: i64::MAX - 1,
        };

        let last = state.insert(title("Last")).unwrap();
        assert_eq!(last.id, TodoId::new(i64::MAX - 1));

        assert!(state.insert(title("One too many")).is_none());
        assert_eq!(state.count(), 1);
    }

    #[test]
    fn update_replaces_title_and_completion() {
        let mut state = TodoState::new();
        let item = state.insert(title("Original")).unwrap();

        let updated = state.update(item.id, title("Updated"), true).unwrap();
        assert_eq!(updated.title.as_str(), "Updated");
        assert!(updated.is_complete);
        assert_eq!(updated.id, item.id);
    }

    #[test]
    fn list_is_insertion_ordered() {
        let mut state = TodoState::new();
        for name in ["c", "a", "b"] {
            state.insert(title(name));
        }

        let titles: Vec<_> = state.list().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }

    #[test]
    fn action_classification() {
        let correlation_id = Uuid::new_v4();
        let command = TodoAction::DeleteTodo {
            correlation_id,
            id: TodoId::new(1),
        };
        let event = TodoAction::TodoNotFound {
            correlation_id,
            id: TodoId::new(1),
        };

        assert!(command.is_command());
        assert!(event.is_event());
        assert_eq!(event.correlation_id(), correlation_id);
    }

    proptest! {
        #[test]
        fn whitespace_only_titles_are_rejected(raw in "[ \t\r\n]*") {
            prop_assert_eq!(TodoTitle::new(raw), Err(TitleError));
        }

        #[test]
        fn titles_with_text_are_accepted(raw in "[ \t]*[A-Za-z0-9][ A-Za-z0-9]*") {
            let parsed = TodoTitle::new(raw.clone());
            prop_assert_eq!(parsed.map(String::from), Ok(raw));
        }

        #[test]
        fn absent_ids_are_not_found(raw in any::<i64>()) {
            let mut state = TodoState::seeded();
            let id = TodoId::new(raw);
            prop_assume!(!(1..=3).contains(&raw));

            prop_assert!(state.get(id).is_none());
            prop_assert!(state.update(id, TodoTitle::new("x").unwrap(), true).is_none());
            prop_assert!(state.remove(id).is_none());
            prop_assert_eq!(state.count(), 3);
        }
    }
}
