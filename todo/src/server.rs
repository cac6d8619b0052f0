//! HTTP server wiring for the todo service.
//!
//! Builds the router over a shared [`AppState`] and runs it until Ctrl+C,
//! then drains the store.

use crate::api;
use crate::config::Config;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::service::{TodoService, TodoStore};
use crate::types::{TodoAction, TodoState};
use axum::{extract::FromRef, routing::get, Router};
use std::sync::Arc;
use todo_app_runtime::Store;
use todo_app_web::correlation_id_layer;
use todo_app_web::handlers::{health_check, health_check_with_store};
use tower_http::trace::TraceLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; the store behind it is shared.
#[derive(Clone)]
pub struct AppState {
    /// Todo operations over the shared store
    pub todos: TodoService,
}

impl AppState {
    /// Create application state around an existing service.
    #[must_use]
    pub const fn new(todos: TodoService) -> Self {
        Self { todos }
    }

    /// Build a fresh store from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let initial = if config.store.seed_data {
            TodoState::seeded()
        } else {
            TodoState::new()
        };

        let store = Store::new(initial, TodoReducer::new(), TodoEnvironment::new());

        Self::new(TodoService::new(Arc::new(store), config.request_timeout()))
    }
}

impl FromRef<AppState> for TodoService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.todos.clone()
    }
}

impl FromRef<AppState> for Arc<TodoStore> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(app_state.todos.store())
    }
}

/// Build the complete Axum router.
///
/// Health checks live at the root, the todo endpoints under `/api`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/todos", get(api::list_todos).post(api::create_todo))
        .route(
            "/todos/:id",
            get(api::get_todo)
                .put(api::update_todo)
                .delete(api::delete_todo),
        );

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/health/ready",
            get(health_check_with_store::<TodoState, TodoAction, TodoEnvironment, TodoReducer>),
        )
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}

/// Bind, serve until Ctrl+C, then shut the store down.
///
/// # Errors
///
/// Returns an error if the address cannot be bound, the server fails, or
/// in-flight effects outlive the shutdown timeout.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config);
    let store = Arc::clone(state.todos.store());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        seed_data = config.store.seed_data,
        "Todo API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped, draining store");
    store.shutdown(config.shutdown_timeout()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
