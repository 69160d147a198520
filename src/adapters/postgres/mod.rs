//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresChatMessageRepository` - Chat message persistence and replay
//!
//! Schema lives in `migrations/` and is applied with [`run_migrations`].

mod chat_message_repository;

pub use chat_message_repository::PostgresChatMessageRepository;

use sqlx::PgPool;

/// Apply embedded migrations to the connected database.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
