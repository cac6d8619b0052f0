//! # Todo App Runtime
//!
//! Runtime implementation for the Todo app's reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer, executes effects
//! - **Reply routing**: Actions produced by effects are handed to the
//!   request/response caller waiting for them, one reply slot per caller
//! - **Health and shutdown**: Readiness reporting and graceful draining
//!
//! ## Example
//!
//! ```ignore
//! use todo_app_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// The reply slot of a waiting caller was dropped unanswered
        #[error("Reply channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Health check status levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    /// Component is fully operational
    Healthy,
    /// Component cannot serve requests
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Health check result for a single component
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    /// Name of the component being checked
    pub component: String,

    /// Current health status
    pub status: HealthStatus,

    /// Optional message providing details
    pub message: Option<String>,

    /// Optional metadata (e.g., counters)
    pub metadata: Vec<(String, String)>,
}

impl HealthCheck {
    /// Create a healthy check result
    #[must_use]
    pub fn healthy(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Healthy,
            message: None,
            metadata: Vec::new(),
        }
    }

    /// Create an unhealthy check result
    #[must_use]
    pub fn unhealthy(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            metadata: Vec::new(),
        }
    }

    /// Attach a metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

/// Decrements the shared pending-effects counter when dropped, so a
/// panicking effect still releases its slot.
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The Store and its effect executor
pub mod store {
    use super::{Arc, AtomicCounterGuard, AtomicUsize, HealthCheck, Ordering, StoreError};
    use futures::future::join_all;
    use std::collections::BTreeMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use todo_app_core::{effect::Effect, reducer::Reducer};
    use tokio::sync::{Mutex, RwLock, oneshot};

    type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

    type Matcher<A> = Box<dyn Fn(&A) -> bool + Send>;

    /// A caller of `send_and_wait_for` that has not been answered yet
    struct Waiter<A> {
        matches: Matcher<A>,
        reply: oneshot::Sender<A>,
    }

    /// Registered waiters, answered oldest first
    struct Waiters<A> {
        next_id: u64,
        pending: BTreeMap<u64, Waiter<A>>,
    }

    impl<A> Waiters<A> {
        const fn new() -> Self {
            Self {
                next_id: 0,
                pending: BTreeMap::new(),
            }
        }

        fn register(&mut self, matches: Matcher<A>, reply: oneshot::Sender<A>) -> u64 {
            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1);
            self.pending.insert(id, Waiter { matches, reply });
            id
        }

        fn remove(&mut self, id: u64) -> Option<Waiter<A>> {
            self.pending.remove(&id)
        }

        /// Removes and returns the first waiter whose predicate accepts `action`
        fn take_match(&mut self, action: &A) -> Option<Waiter<A>> {
            let id = self
                .pending
                .iter()
                .find(|(_, waiter)| (waiter.matches)(action))
                .map(|(id, _)| *id)?;
            self.pending.remove(&id)
        }
    }

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a Store is cheap; clones share state, waiters and shutdown
    /// tracking.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Callers waiting for an effect-produced action
        waiters: Arc<Mutex<Waiters<A>>>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                waiters: Arc::clone(&self.waiters),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Clone + Send + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                waiters: Arc::new(Mutex::new(Waiters::new())),
            }
        }

        /// Perform a health check on the Store
        ///
        /// The store is unhealthy once shutdown has started.
        #[must_use]
        pub fn health(&self) -> HealthCheck {
            let pending = self.pending_effects.load(Ordering::Acquire);

            let check = if self.is_shutting_down() {
                HealthCheck::unhealthy("store", "Store is shutting down")
            } else {
                HealthCheck::healthy("store")
            };

            check.with_metadata("pending_effects", pending.to_string())
        }

        /// Returns `true` once [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Number of effects currently executing
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Sets the shutdown flag (rejecting new actions), then waits for
        /// pending effects to complete.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    metrics::counter!("store.shutdown.completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Releases the lock and spawns the returned effects
        ///
        /// Concurrent `send()` calls serialize at the reducer. `send()`
        /// returns once effects are started, not when they finish.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.is_shutting_down() {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!(effects = effects.len(), "Reducer completed");
                effects
            };

            for effect in effects {
                self.execute_effect(effect);
            }

            Ok(())
        }

        /// Send an action and wait for a matching result action
        ///
        /// Designed for request-response callers (HTTP handlers). A reply
        /// slot is registered before sending; the first effect-produced
        /// action matching `predicate` is delivered into it and also fed
        /// back to the reducer as usual. Each action answers at most one
        /// waiter, and a reply is never dropped because other callers are
        /// busy.
        ///
        /// The initial action itself never answers. Concurrent callers should
        /// tag actions with a correlation id and match on it.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action within `timeout`
        /// - [`StoreError::ChannelClosed`]: the reply slot was dropped
        /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool + Send + 'static,
        {
            let (reply, mut rx) = oneshot::channel();

            // Register BEFORE sending so the outcome cannot be missed
            let waiter_id = self.waiters.lock().await.register(Box::new(predicate), reply);

            if let Err(error) = self.send(action).await {
                self.waiters.lock().await.remove(waiter_id);
                return Err(error);
            }

            match tokio::time::timeout(timeout, &mut rx).await {
                Ok(Ok(action)) => Ok(action),
                Ok(Err(_)) => Err(StoreError::ChannelClosed),
                Err(_) => {
                    if self.waiters.lock().await.remove(waiter_id).is_some() {
                        return Err(StoreError::Timeout);
                    }
                    // Claimed between the deadline and the removal; the reply is in flight
                    rx.await.map_err(|_| StoreError::ChannelClosed)
                },
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Spawn an effect, tracking it for shutdown
        fn execute_effect(&self, effect: Effect<A>) {
            if effect.is_none() {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                return;
            }

            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));
            let run = self.clone().run_effect(effect);

            tokio::spawn(async move {
                let _guard = guard;
                run.await;
            });
        }

        /// Deliver a copy of `action` to the oldest waiter it matches, if any
        async fn answer_waiter(&self, action: A) -> A {
            let waiter = self.waiters.lock().await.take_match(&action);

            if let Some(waiter) = waiter {
                if waiter.reply.send(action.clone()).is_err() {
                    tracing::debug!("Waiter went away before its reply arrived");
                }
            }

            action
        }

        /// Drive an effect to completion
        ///
        /// Boxed because `Parallel` and `Sequential` recurse.
        fn run_effect(self, effect: Effect<A>) -> BoxFuture {
            Box::pin(async move {
                match effect {
                    Effect::None => {
                        metrics::counter!("store.effects.executed", "type" => "none")
                            .increment(1);
                    },
                    Effect::Future(fut) => {
                        metrics::counter!("store.effects.executed", "type" => "future")
                            .increment(1);

                        if let Some(action) = fut.await {
                            // Answer the waiter first, so it sees the outcome
                            // even if the feedback send is rejected during shutdown
                            let action = self.answer_waiter(action).await;

                            if let Err(error) = self.send(action).await {
                                tracing::debug!(%error, "Effect feedback action dropped");
                            }
                        }
                    },
                    Effect::Parallel(effects) => {
                        metrics::counter!("store.effects.executed", "type" => "parallel")
                            .increment(1);
                        join_all(effects.into_iter().map(|e| self.clone().run_effect(e))).await;
                    },
                    Effect::Sequential(effects) => {
                        metrics::counter!("store.effects.executed", "type" => "sequential")
                            .increment(1);
                        for effect in effects {
                            self.clone().run_effect(effect).await;
                        }
                    },
                }
            })
        }
    }
}
