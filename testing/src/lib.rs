//! # Todo App Testing
//!
//! Testing utilities and helpers for the Todo app's reducer architecture.
//!
//! This crate provides:
//! - [`ReducerTest`]: a Given-When-Then harness for reducers
//! - [`assertions`]: helpers for inspecting effect descriptions
//! - [`collect_actions`]: drives effects and returns the actions they emit
//!
//! ## Example
//!
//! ```ignore
//! use todo_app_testing::{assertions, ReducerTest};
//!
//! #[test]
//! fn create_assigns_next_id() {
//!     ReducerTest::new(TodoReducer::new())
//!         .with_env(TodoEnvironment::default())
//!         .given_state(TodoState::seeded())
//!         .when_action(create("Buy milk"))
//!         .then_state(|state| assert_eq!(state.count(), 4))
//!         .then_effects(assertions::assert_has_future_effect)
//!         .run();
//! }
//! ```

pub mod reducer_test;

// Re-export commonly used items
pub use reducer_test::{ReducerTest, assertions, collect_actions};
