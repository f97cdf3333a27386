//! User service for validation and orchestration over the repository

use std::sync::Arc;

use crate::domain::user::{
    validate_email, validate_username, User, UserPatch, UserRepository, UserStatus,
};
use crate::domain::DomainError;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub status: UserStatus,
}

/// Request for partially updating a user
///
/// Raw field values as received from the caller; validation happens in the
/// service before anything reaches the repository.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.status.is_none()
    }
}

/// User service for CRUD and status management
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        // Validate username
        validate_username(&request.username).map_err(|e| DomainError::validation(e.to_string()))?;

        // Validate email
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;

        let user = User::new(&request.username, &request.email, request.status);

        self.repository.create(user).await
    }

    /// Create a batch of users atomically
    pub async fn bulk_create(
        &self,
        requests: Vec<CreateUserRequest>,
    ) -> Result<Vec<User>, DomainError> {
        // Validate the whole batch up front so nothing is persisted on a
        // late validation failure.
        let mut users = Vec::with_capacity(requests.len());

        for request in &requests {
            validate_username(&request.username)
                .map_err(|e| DomainError::validation(e.to_string()))?;
            validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;

            users.push(User::new(&request.username, &request.email, request.status));
        }

        self.repository.bulk_create(users).await
    }

    /// Get a user by ID
    pub async fn get(&self, id: i64) -> Result<Option<User>, DomainError> {
        self.repository.find_by_id(id).await
    }

    /// Get a user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.repository.find_by_username(username).await
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository.find_by_email(email).await
    }

    /// List users, newest ids last, with optional pagination
    pub async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, DomainError> {
        self.repository.find_all(limit, offset).await
    }

    /// List users with the given status
    pub async fn list_by_status(
        &self,
        status: UserStatus,
        limit: Option<i64>,
    ) -> Result<Vec<User>, DomainError> {
        self.repository.find_by_status(status, limit).await
    }

    /// Count all users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count_total().await
    }

    /// Check whether a username is taken
    pub async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        self.repository.exists_by_username(username).await
    }

    /// Check whether an email is taken
    pub async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        self.repository.exists_by_email(email).await
    }

    /// Replace all mutable fields of an existing user
    pub async fn update(&self, user: &User) -> Result<User, DomainError> {
        validate_username(user.username()).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(user.email()).map_err(|e| DomainError::validation(e.to_string()))?;

        self.repository.update(user).await
    }

    /// Update only the supplied fields of a user
    ///
    /// Returns `Ok(None)` when no user with the given id exists. An empty
    /// request is a validation error, not a no-op.
    pub async fn update_partial(
        &self,
        id: i64,
        request: UpdateUserRequest,
    ) -> Result<Option<User>, DomainError> {
        if request.is_empty() {
            return Err(DomainError::validation(
                "At least one field must be provided for update",
            ));
        }

        if let Some(username) = &request.username {
            validate_username(username).map_err(|e| DomainError::validation(e.to_string()))?;
        }
        if let Some(email) = &request.email {
            validate_email(email).map_err(|e| DomainError::validation(e.to_string()))?;
        }

        let patch = UserPatch {
            username: request.username,
            email: request.email,
            status: request.status,
        };

        self.repository.update_partial(id, patch).await
    }

    /// Set a user's status
    pub async fn update_status(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>, DomainError> {
        self.repository.update_status(id, status).await
    }

    /// Delete a user by ID
    pub async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.repository.delete_by_id(id).await
    }

    /// Delete a user by username
    pub async fn delete_by_username(&self, username: &str) -> Result<bool, DomainError> {
        self.repository.delete_by_username(username).await
    }

    /// Soft-delete a user by marking it inactive
    pub async fn soft_delete(&self, id: i64) -> Result<Option<User>, DomainError> {
        self.repository.soft_delete(id).await
    }

    /// Delete multiple users by ID, returning how many existed
    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<usize, DomainError> {
        self.repository.bulk_delete(ids).await
    }

    /// Delete every user
    pub async fn delete_all(&self) -> Result<usize, DomainError> {
        self.repository.delete_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn make_request(username: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            status: UserStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_create_user() {
        let service = create_service();

        let user = service
            .create(make_request("testuser", "test@example.com"))
            .await
            .unwrap();

        assert!(user.id().is_some());
        assert_eq!(user.username(), "testuser");
        assert_eq!(user.email(), "test@example.com");
        assert_eq!(user.status(), UserStatus::Active);
    }

    #[tokio::test]
    async fn test_create_user_invalid_username() {
        let service = create_service();

        let result = service.create(make_request("ab", "test@example.com")).await; // Too short
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_user_invalid_email() {
        let service = create_service();

        let result = service.create(make_request("testuser", "not-an-email")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let service = create_service();

        service
            .create(make_request("testuser", "first@example.com"))
            .await
            .unwrap();

        let result = service
            .create(make_request("testuser", "second@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_bulk_create_validates_before_persisting() {
        let service = create_service();

        let result = service
            .bulk_create(vec![
                make_request("gooduser", "good@example.com"),
                make_request("x", "bad@example.com"), // Too short
            ])
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bulk_create() {
        let service = create_service();

        let created = service
            .bulk_create(vec![
                make_request("user1", "user1@example.com"),
                make_request("user2", "user2@example.com"),
            ])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_get_by_username_and_email() {
        let service = create_service();

        service
            .create(make_request("testuser", "test@example.com"))
            .await
            .unwrap();

        let by_username = service.get_by_username("testuser").await.unwrap();
        assert!(by_username.is_some());

        let by_email = service.get_by_email("test@example.com").await.unwrap();
        assert!(by_email.is_some());

        let missing = service.get_by_username("ghost").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_with_pagination() {
        let service = create_service();

        for i in 1..=3 {
            service
                .create(make_request(
                    &format!("user{}", i),
                    &format!("user{}@example.com", i),
                ))
                .await
                .unwrap();
        }

        let page = service.list(Some(2), Some(1)).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].username(), "user2");
    }

    #[tokio::test]
    async fn test_update_partial_rejects_empty_request() {
        let service = create_service();

        let user = service
            .create(make_request("testuser", "test@example.com"))
            .await
            .unwrap();

        let result = service
            .update_partial(user.id().unwrap(), UpdateUserRequest::default())
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_partial_validates_new_values() {
        let service = create_service();

        let user = service
            .create(make_request("testuser", "test@example.com"))
            .await
            .unwrap();

        let request = UpdateUserRequest {
            email: Some("no-at-sign".to_string()),
            ..Default::default()
        };

        let result = service.update_partial(user.id().unwrap(), request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        // The stored user is untouched
        let stored = service.get(user.id().unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.email(), "test@example.com");
    }

    #[tokio::test]
    async fn test_update_partial() {
        let service = create_service();

        let user = service
            .create(make_request("testuser", "test@example.com"))
            .await
            .unwrap();

        let request = UpdateUserRequest {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };

        let updated = service
            .update_partial(user.id().unwrap(), request)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.email(), "new@example.com");
        assert_eq!(updated.username(), "testuser");
    }

    #[tokio::test]
    async fn test_update_status_and_soft_delete() {
        let service = create_service();

        let user = service
            .create(make_request("testuser", "test@example.com"))
            .await
            .unwrap();
        let id = user.id().unwrap();

        let banned = service
            .update_status(id, UserStatus::Banned)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(banned.status(), UserStatus::Banned);

        let softly_deleted = service.soft_delete(id).await.unwrap().unwrap();
        assert_eq!(softly_deleted.status(), UserStatus::Inactive);

        // Still retrievable after soft delete
        assert!(service.get(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let service = create_service();

        let user = service
            .create(make_request("testuser", "test@example.com"))
            .await
            .unwrap();
        let id = user.id().unwrap();

        assert!(service.delete(id).await.unwrap());
        assert!(!service.delete(id).await.unwrap());
        assert!(service.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_all() {
        let service = create_service();

        service
            .create(make_request("user1", "user1@example.com"))
            .await
            .unwrap();
        service
            .create(make_request("user2", "user2@example.com"))
            .await
            .unwrap();

        assert_eq!(service.delete_all().await.unwrap(), 2);
        assert_eq!(service.count().await.unwrap(), 0);
    }
}
