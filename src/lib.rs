//! Pluto API
//!
//! A user management service backed by PostgreSQL:
//! - CRUD and bulk operations over user records
//! - Unique usernames and emails enforced at both application and
//!   database level
//! - Lifecycle status handling with soft deletion

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::storage::{connect_pool, run_migrations};
use infrastructure::user::{PostgresUserRepository, UserService};

/// Build the application state against the configured database
///
/// Connects the pool, applies pending migrations, and wires the user
/// service on top of the Postgres repository.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = connect_pool(&config.database.to_postgres_config()).await?;

    run_migrations(&pool).await?;

    let repository = Arc::new(PostgresUserRepository::new(pool));
    let user_service = Arc::new(UserService::new(repository));

    Ok(AppState::new(user_service))
}
