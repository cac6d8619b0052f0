//! Todo API server.
//!
//! # Usage
//!
//! ```bash
//! TODO_PORT=8080 RUST_LOG=debug cargo run --bin todo-api
//! ```

use todo_app::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_app=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        address = %config.bind_address(),
        request_timeout_ms = config.store.request_timeout_ms,
        "Configuration loaded"
    );

    todo_app::serve(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
