use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::health;
use super::state::AppState;
use super::users;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // User endpoints
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/bulk", post(users::bulk_create_users))
        .route("/users/count", get(users::count_users))
        .route(
            "/users/by-username/{username}",
            get(users::get_user_by_username),
        )
        .route(
            "/users/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{id}/status", patch(users::update_user_status))
        .route("/users/{id}/soft", delete(users::soft_delete_user))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::infrastructure::user::{InMemoryUserRepository, UserService};

    // Route conflicts panic at registration time, so building the full
    // router is enough to catch a bad route table.
    #[tokio::test]
    async fn test_router_builds_with_state() {
        let service = Arc::new(UserService::new(Arc::new(InMemoryUserRepository::new())));
        let state = AppState::new(service);

        let _router = create_router_with_state(state);
    }
}
