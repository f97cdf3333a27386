//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::warn;

use crate::domain::user::{User, UserPatch, UserRepository, UserStatus};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, username, email, status";

/// PostgreSQL implementation of UserRepository
///
/// Uniqueness is enforced in two phases: an explicit pre-check on create, and
/// translation of the database's own unique-constraint errors for the race
/// window between check and insert. Every mutating operation commits at the
/// end of a single logical transaction.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_user(
        tx: &mut Transaction<'_, Postgres>,
        user: &User,
    ) -> Result<User, sqlx::Error> {
        let row = sqlx::query(
            "INSERT INTO users (username, email, status) VALUES ($1, $2, $3) \
             RETURNING id, username, email, status",
        )
        .bind(user.username())
        .bind(user.email())
        .bind(user.status().as_str())
        .fetch_one(&mut **tx)
        .await?;

        row_to_user(&row).map_err(|e| sqlx::Error::Decode(e.to_string().into()))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        // Pre-check gives a descriptive message; the constraint translation
        // below still closes the race window between check and insert.
        if self.exists_by_username(user.username()).await?
            || self.exists_by_email(user.email()).await?
        {
            let message = format!(
                "User already exists with username '{}' or email '{}'",
                user.username(),
                user.email()
            );
            warn!("{}", message);
            return Err(DomainError::conflict(message));
        }

        let mut tx = begin(&self.pool).await?;

        let created = Self::insert_user(&mut tx, &user)
            .await
            .map_err(|e| translate_insert_error(&e, &user))?;

        commit(tx).await?;

        Ok(created)
    }

    async fn bulk_create(&self, users: Vec<User>) -> Result<Vec<User>, DomainError> {
        let mut tx = begin(&self.pool).await?;
        let mut created = Vec::with_capacity(users.len());

        for user in &users {
            // Dropping the transaction on the error path rolls the whole
            // batch back; no partial commit.
            let persisted = Self::insert_user(&mut tx, user)
                .await
                .map_err(|e| translate_insert_error(&e, user))?;
            created.push(persisted);
        }

        commit(tx).await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_all(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, DomainError> {
        // Postgres treats a NULL limit/offset as absent, so both stay
        // independently optional in one query.
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn find_by_status(
        &self,
        status: UserStatus,
        limit: Option<i64>,
    ) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE status = $1 ORDER BY id LIMIT $2"
        ))
        .bind(status.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users by status: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count_total(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check username: {}", e)))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check email: {}", e)))
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let id = user
            .id()
            .ok_or_else(|| DomainError::validation("User id is required for update"))?;

        let row = sqlx::query(&format!(
            "UPDATE users SET username = $2, email = $3, status = $4 WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(user.username())
        .bind(user.email())
        .bind(user.status().as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e.to_string()) {
                conflict_for(&e.to_string(), user.username(), user.email())
            } else {
                DomainError::storage(format!("Failed to update user: {}", e))
            }
        })?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(DomainError::not_found(format!(
                "User with id {} not found",
                id
            ))),
        }
    }

    async fn update_partial(
        &self,
        id: i64,
        patch: UserPatch,
    ) -> Result<Option<User>, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut user = row_to_user(&row)?;

        if let Some(username) = patch.username {
            user.update_username(username);
        }
        if let Some(email) = patch.email {
            user.update_email(email);
        }
        if let Some(status) = patch.status {
            user.update_status(status);
        }

        sqlx::query("UPDATE users SET username = $2, email = $3, status = $4 WHERE id = $1")
            .bind(id)
            .bind(user.username())
            .bind(user.email())
            .bind(user.status().as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e.to_string()) {
                    conflict_for(&e.to_string(), user.username(), user.email())
                } else {
                    DomainError::storage(format!("Failed to update user: {}", e))
                }
            })?;

        commit(tx).await?;

        Ok(Some(user))
    }

    async fn update_status(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "UPDATE users SET status = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update status: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn bulk_delete(&self, ids: &[i64]) -> Result<usize, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to bulk delete users: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_all(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete all users: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }
}

async fn begin(pool: &PgPool) -> Result<Transaction<'_, Postgres>, DomainError> {
    pool.begin()
        .await
        .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: i64 = row.get("id");
    let username: String = row.get("username");
    let email: String = row.get("email");
    let status: String = row.get("status");

    let status = UserStatus::parse(&status)
        .map_err(|e| DomainError::storage(format!("Invalid status in database: {}", e)))?;

    Ok(User::with_id(id, username, email, status))
}

fn is_unique_violation(message: &str) -> bool {
    message.contains("duplicate key") || message.contains("unique constraint")
}

fn conflict_for(message: &str, username: &str, email: &str) -> DomainError {
    if message.contains("email") {
        DomainError::conflict(format!("Email '{}' already exists", email))
    } else {
        DomainError::conflict(format!("Username '{}' already exists", username))
    }
}

fn translate_insert_error(error: &sqlx::Error, user: &User) -> DomainError {
    let message = error.to_string();

    if is_unique_violation(&message) {
        warn!("Unique constraint hit while creating user: {}", message);
        conflict_for(&message, user.username(), user.email())
    } else {
        DomainError::storage(format!("Failed to create user: {}", error))
    }
}
