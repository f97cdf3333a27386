//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserStatus};
use crate::domain::DomainError;

/// Fields for a partial update
///
/// Only fields that are `Some` are applied; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.status.is_none()
    }
}

/// Repository trait for user storage
///
/// Lookups return `Ok(None)` on absence; errors are reserved for constraint
/// violations and storage failures. Every mutating operation is a single
/// logical transaction in the implementing backend.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Create a new user, returning it with a storage-assigned identifier.
    ///
    /// Fails with `DomainError::Conflict` when the username or email is
    /// already taken.
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Create multiple users in one transaction, all-or-nothing.
    ///
    /// Any uniqueness violation fails the entire batch with
    /// `DomainError::Conflict` and nothing is persisted.
    async fn bulk_create(&self, users: Vec<User>) -> Result<Vec<User>, DomainError>;

    /// Find a user by identifier
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// List users ordered by identifier, with optional limit and offset
    async fn find_all(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, DomainError>;

    /// List users with the given status, with an optional limit
    async fn find_by_status(
        &self,
        status: UserStatus,
        limit: Option<i64>,
    ) -> Result<Vec<User>, DomainError>;

    /// Total row count regardless of status
    async fn count_total(&self) -> Result<usize, DomainError>;

    /// Check whether a username is taken
    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    /// Check whether an email is taken
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Full replace of username, email, and status for a persisted user.
    ///
    /// Fails with `DomainError::Validation` when the user has no identifier
    /// and with `DomainError::NotFound` when no matching row exists.
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Apply only the fields present in the patch; returns `Ok(None)` if the
    /// id does not exist.
    async fn update_partial(&self, id: i64, patch: UserPatch)
        -> Result<Option<User>, DomainError>;

    /// Narrow overwrite of the status field only
    async fn update_status(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>, DomainError>;

    /// Delete a user by id; true if a row was removed
    async fn delete_by_id(&self, id: i64) -> Result<bool, DomainError>;

    /// Delete a user by username; true if a row was removed
    async fn delete_by_username(&self, username: &str) -> Result<bool, DomainError>;

    /// Mark a user inactive without removing the row.
    ///
    /// A soft-deleted user is indistinguishable from one explicitly set
    /// inactive by a status update.
    async fn soft_delete(&self, id: i64) -> Result<Option<User>, DomainError> {
        self.update_status(id, UserStatus::Inactive).await
    }

    /// Delete all matching rows, returning the count actually removed.
    /// Missing ids are silently skipped.
    async fn bulk_delete(&self, ids: &[i64]) -> Result<usize, DomainError>;

    /// Unconditional wipe of all rows, returning the count removed.
    /// Irreversible; any confirmation gate belongs above this layer.
    async fn delete_all(&self) -> Result<usize, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_is_empty() {
        assert!(UserPatch::default().is_empty());

        let patch = UserPatch {
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
