//! In-memory user repository implementation
//!
//! Mirrors the Postgres backend's semantics (uniqueness, all-or-nothing bulk
//! create, id-ordered listing) so service and contract tests can run without
//! a database.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserPatch, UserRepository, UserStatus};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Inner {
    /// BTreeMap keeps iteration ordered by id, matching `ORDER BY id`
    users: BTreeMap<i64, User>,
    next_id: i64,
}

impl Inner {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn username_taken(&self, username: &str) -> bool {
        self.users.values().any(|u| u.username() == username)
    }

    fn email_taken(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email() == email)
    }

    fn check_unique(&self, user: &User) -> Result<(), DomainError> {
        if self.username_taken(user.username()) || self.email_taken(user.email()) {
            return Err(DomainError::conflict(format!(
                "User already exists with username '{}' or email '{}'",
                user.username(),
                user.email()
            )));
        }
        Ok(())
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;

        inner.check_unique(&user)?;

        let id = inner.assign_id();
        let persisted = User::with_id(id, user.username(), user.email(), user.status());
        inner.users.insert(id, persisted.clone());

        Ok(persisted)
    }

    async fn bulk_create(&self, users: Vec<User>) -> Result<Vec<User>, DomainError> {
        let mut inner = self.inner.write().await;

        // Validate the whole batch against current state and against itself
        // before touching the map, so a late conflict leaves nothing behind.
        for (i, user) in users.iter().enumerate() {
            inner.check_unique(user)?;

            let collides_within_batch = users[..i].iter().any(|other| {
                other.username() == user.username() || other.email() == user.email()
            });

            if collides_within_batch {
                return Err(DomainError::conflict(format!(
                    "User already exists with username '{}' or email '{}'",
                    user.username(),
                    user.email()
                )));
            }
        }

        let mut created = Vec::with_capacity(users.len());

        for user in &users {
            let id = inner.assign_id();
            let persisted = User::with_id(id, user.username(), user.email(), user.status());
            inner.users.insert(id, persisted.clone());
            created.push(persisted);
        }

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.username() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email() == email).cloned())
    }

    async fn find_all(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, DomainError> {
        let inner = self.inner.read().await;

        let users = inner
            .users
            .values()
            .skip(offset.unwrap_or(0).max(0) as usize)
            .take(limit.map_or(usize::MAX, |l| l.max(0) as usize))
            .cloned()
            .collect();

        Ok(users)
    }

    async fn find_by_status(
        &self,
        status: UserStatus,
        limit: Option<i64>,
    ) -> Result<Vec<User>, DomainError> {
        let inner = self.inner.read().await;

        let users = inner
            .users
            .values()
            .filter(|u| u.status() == status)
            .take(limit.map_or(usize::MAX, |l| l.max(0) as usize))
            .cloned()
            .collect();

        Ok(users)
    }

    async fn count_total(&self) -> Result<usize, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.len())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let id = user
            .id()
            .ok_or_else(|| DomainError::validation("User id is required for update"))?;

        let mut inner = self.inner.write().await;

        if !inner.users.contains_key(&id) {
            return Err(DomainError::not_found(format!(
                "User with id {} not found",
                id
            )));
        }

        let username_collides = inner
            .users
            .iter()
            .any(|(other_id, u)| *other_id != id && u.username() == user.username());
        let email_collides = inner
            .users
            .iter()
            .any(|(other_id, u)| *other_id != id && u.email() == user.email());

        if username_collides {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username()
            )));
        }
        if email_collides {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                user.email()
            )));
        }

        let updated = User::with_id(id, user.username(), user.email(), user.status());
        inner.users.insert(id, updated.clone());

        Ok(updated)
    }

    async fn update_partial(
        &self,
        id: i64,
        patch: UserPatch,
    ) -> Result<Option<User>, DomainError> {
        let mut inner = self.inner.write().await;

        let Some(existing) = inner.users.get(&id).cloned() else {
            return Ok(None);
        };

        let mut user = existing;

        if let Some(username) = patch.username {
            user.update_username(username);
        }
        if let Some(email) = patch.email {
            user.update_email(email);
        }
        if let Some(status) = patch.status {
            user.update_status(status);
        }

        inner.users.insert(id, user.clone());

        Ok(Some(user))
    }

    async fn update_status(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>, DomainError> {
        let mut inner = self.inner.write().await;

        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };

        user.update_status(status);

        Ok(Some(user.clone()))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.remove(&id).is_some())
    }

    async fn delete_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;

        let id = inner
            .users
            .iter()
            .find(|(_, u)| u.username() == username)
            .map(|(id, _)| *id);

        match id {
            Some(id) => {
                inner.users.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn bulk_delete(&self, ids: &[i64]) -> Result<usize, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut inner = self.inner.write().await;
        let mut deleted = 0;

        for id in ids {
            if inner.users.remove(id).is_some() {
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    async fn delete_all(&self) -> Result<usize, DomainError> {
        let mut inner = self.inner.write().await;
        let deleted = inner.users.len();
        inner.users.clear();
        Ok(deleted)
    }
}
