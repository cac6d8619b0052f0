//! In-memory Todo CRUD service built on the reducer/store runtime.
//!
//! The todo list lives in a [`TodoStore`]. Writes go through
//! [`TodoReducer`] as commands and each answers with one outcome event,
//! which [`TodoService`] waits for. The HTTP surface under `/api/todos` is
//! a thin Axum shell over the service.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use todo_app::{TodoEnvironment, TodoReducer, TodoService, TodoState, TodoTitle};
//! use todo_app_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Store::new(TodoState::seeded(), TodoReducer::new(), TodoEnvironment::new());
//! let todos = TodoService::new(Arc::new(store), Duration::from_secs(5));
//!
//! let item = todos.insert(TodoTitle::new("Buy milk")?).await?;
//! assert_eq!(item.id.get(), 4);
//! assert_eq!(todos.list_all().await.len(), 4);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod reducer;
pub mod server;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use server::{build_router, serve, AppState};
pub use service::{TodoError, TodoService, TodoStore};
pub use types::{TitleError, TodoAction, TodoId, TodoItem, TodoState, TodoTitle};
