//! User entity and status enumeration

use serde::{Deserialize, Serialize};

use super::validation::UserValidationError;

/// Lifecycle status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Pending,
    Banned,
}

impl UserStatus {
    /// All valid status values, in their primitive string form
    pub const ALL: [UserStatus; 4] = [
        UserStatus::Active,
        UserStatus::Inactive,
        UserStatus::Pending,
        UserStatus::Banned,
    ];

    /// The primitive string form stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
            Self::Banned => "banned",
        }
    }

    /// Parse a status from its primitive string form
    pub fn parse(s: &str) -> Result<Self, UserValidationError> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            "banned" => Ok(Self::Banned),
            other => Err(UserValidationError::InvalidStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// User entity
///
/// Pure in-memory value; all validation and uniqueness enforcement lives at
/// the boundary layers (service validation and repository constraints).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier assigned by storage; absent until persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    username: String,
    email: String,
    status: UserStatus,
}

impl User {
    /// Create a user that has not been persisted yet
    pub fn new(username: impl Into<String>, email: impl Into<String>, status: UserStatus) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            status,
        }
    }

    /// Rehydrate a persisted user from storage
    pub fn with_id(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        status: UserStatus,
    ) -> Self {
        Self {
            id: Some(id),
            username: username.into(),
            email: email.into(),
            status,
        }
    }

    // Getters

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    // Mutators. Uniqueness is the repository's responsibility, so these
    // replace fields unconditionally.

    /// Set status to inactive
    pub fn deactivate(&mut self) {
        self.status = UserStatus::Inactive;
    }

    pub fn update_email(&mut self, new_email: impl Into<String>) {
        self.email = new_email.into();
    }

    pub fn update_username(&mut self, new_username: impl Into<String>) {
        self.username = new_username.into();
    }

    pub fn update_status(&mut self, new_status: UserStatus) {
        self.status = new_status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new("johndoe", "john@example.com", UserStatus::Active)
    }

    #[test]
    fn test_status_round_trip() {
        for status in UserStatus::ALL {
            assert_eq!(UserStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_invalid() {
        let err = UserStatus::parse("deleted").unwrap_err();
        assert_eq!(err, UserValidationError::InvalidStatus("deleted".to_string()));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(UserStatus::Banned.to_string(), "banned");
    }

    #[test]
    fn test_new_user_has_no_id() {
        let user = create_test_user();
        assert!(user.id().is_none());
        assert_eq!(user.username(), "johndoe");
        assert_eq!(user.email(), "john@example.com");
        assert_eq!(user.status(), UserStatus::Active);
    }

    #[test]
    fn test_with_id() {
        let user = User::with_id(7, "johndoe", "john@example.com", UserStatus::Pending);
        assert_eq!(user.id(), Some(7));
        assert_eq!(user.status(), UserStatus::Pending);
    }

    #[test]
    fn test_deactivate() {
        let mut user = create_test_user();
        user.deactivate();
        assert_eq!(user.status(), UserStatus::Inactive);
    }

    #[test]
    fn test_mutators_replace_unconditionally() {
        let mut user = create_test_user();

        user.update_username("janedoe");
        user.update_email("jane@example.com");
        user.update_status(UserStatus::Banned);

        assert_eq!(user.username(), "janedoe");
        assert_eq!(user.email(), "jane@example.com");
        assert_eq!(user.status(), UserStatus::Banned);
    }

    #[test]
    fn test_serialization_uses_primitive_status() {
        let user = User::with_id(1, "johndoe", "john@example.com", UserStatus::Active);
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_serialization_omits_absent_id() {
        let user = create_test_user();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("id").is_none());
    }
}
