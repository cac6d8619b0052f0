//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use todo_app_core::reducer::Reducer;
use todo_app_runtime::{HealthCheck, HealthStatus, Store};

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT inspect the store.
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Health check with Store diagnostics (for readiness).
///
/// # Status Codes
///
/// - 200 OK: Healthy
/// - 503 Service Unavailable: Unhealthy (store shutting down)
///
/// ```text
/// GET /health/ready
/// ```
///
/// ```json
/// {
///   "component": "store",
///   "status": "Healthy",
///   "message": null,
///   "metadata": [["pending_effects", "0"]]
/// }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check_with_store<S, A, E, R>(
    State(store): State<Arc<Store<S, A, E, R>>>,
) -> (StatusCode, Json<HealthCheck>)
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
    A: Clone + Send + 'static,
    E: Clone + Send + Sync + 'static,
{
    let health = store.health();

    let status = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(health))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use todo_app_core::{effect::Effect, SmallVec};

    #[derive(Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = ();
        type Action = ();
        type Environment = ();

        fn reduce(&self, _state: &mut (), _action: (), _env: &()) -> SmallVec<[Effect<()>; 4]> {
            SmallVec::new()
        }
    }

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_health_check_with_healthy_store() {
        let store = Arc::new(Store::new((), TestReducer, ()));

        let (status, Json(health)) = health_check_with_store(State(store)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(health.status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_health_check_during_shutdown() {
        let store = Arc::new(Store::new((), TestReducer, ()));
        store.shutdown(Duration::from_millis(10)).await.unwrap();

        let (status, Json(health)) = health_check_with_store(State(store)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(health.status, HealthStatus::Unhealthy);
    }
}
