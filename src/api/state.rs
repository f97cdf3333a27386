//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::UserRepository;
use crate::domain::{DomainError, User, UserStatus};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn bulk_create(&self, requests: Vec<CreateUserRequest>)
        -> Result<Vec<User>, DomainError>;
    async fn get(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, DomainError>;
    async fn list_by_status(
        &self,
        status: UserStatus,
        limit: Option<i64>,
    ) -> Result<Vec<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    async fn update_partial(
        &self,
        id: i64,
        request: UpdateUserRequest,
    ) -> Result<Option<User>, DomainError>;
    async fn update_status(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>, DomainError>;
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
    async fn soft_delete(&self, id: i64) -> Result<Option<User>, DomainError>;
}

#[async_trait::async_trait]
impl<R: UserRepository + 'static> UserServiceTrait for UserService<R> {
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn bulk_create(
        &self,
        requests: Vec<CreateUserRequest>,
    ) -> Result<Vec<User>, DomainError> {
        UserService::bulk_create(self, requests).await
    }

    async fn get(&self, id: i64) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        UserService::get_by_username(self, username).await
    }

    async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, DomainError> {
        UserService::list(self, limit, offset).await
    }

    async fn list_by_status(
        &self,
        status: UserStatus,
        limit: Option<i64>,
    ) -> Result<Vec<User>, DomainError> {
        UserService::list_by_status(self, status, limit).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }

    async fn update_partial(
        &self,
        id: i64,
        request: UpdateUserRequest,
    ) -> Result<Option<User>, DomainError> {
        UserService::update_partial(self, id, request).await
    }

    async fn update_status(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>, DomainError> {
        UserService::update_status(self, id, status).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        UserService::delete(self, id).await
    }

    async fn soft_delete(&self, id: i64) -> Result<Option<User>, DomainError> {
        UserService::soft_delete(self, id).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(user_service: Arc<dyn UserServiceTrait>) -> Self {
        Self { user_service }
    }
}
