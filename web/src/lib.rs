//! Axum web framework integration for the Todo app.
//!
//! This crate is the imperative shell around the reducer core:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, status codes
//! │  - Request parsing and validation       │  ← Correlation IDs, tracing
//! │  - Response serialization               │
//! ├─────────────────────────────────────────┤
//! │         Functional Core                 │
//! │  - Reducers over in-memory state        │  ← Testable without HTTP
//! │  - Effect descriptions (values)         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract and validate** the typed request body
//! 3. **Dispatch** an action through the `Store`
//! 4. **Wait** for the outcome action
//! 5. **Map** the outcome (or [`AppError`]) to an HTTP response

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::{AppError, ErrorBody};
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
