//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username is too short. Minimum length is {0} characters")]
    UsernameTooShort(usize),

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error(
        "Username contains invalid character: '{0}'. Only alphanumeric characters, underscores, and hyphens are allowed"
    )]
    InvalidUsernameCharacter(char),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email must contain '@'")]
    MalformedEmail,

    #[error("Invalid status: '{0}'. Valid values: active, inactive, pending, banned")]
    InvalidStatus(String),
}

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;
const MAX_EMAIL_LENGTH: usize = 100;

/// Validate a username
///
/// Rules:
/// - Cannot be empty
/// - Minimum 3 characters
/// - Maximum 50 characters
/// - Only alphanumeric characters, underscores, and hyphens
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if username.len() < MIN_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    for c in username.chars() {
        if !c.is_ascii_alphanumeric() && c != '_' && c != '-' {
            return Err(UserValidationError::InvalidUsernameCharacter(c));
        }
    }

    Ok(())
}

/// Validate an email address
///
/// Rules:
/// - Cannot be empty
/// - Maximum 100 characters
/// - Must contain an '@'
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    // Character count, not byte length; the column limit is VARCHAR(100)
    // and multibyte addresses within it must pass.
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !email.contains('@') {
        return Err(UserValidationError::MalformedEmail);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Username tests
    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("johndoe").is_ok());
        assert!(validate_username("user_name").is_ok());
        assert!(validate_username("user-name").is_ok());
        assert!(validate_username("User123").is_ok());
    }

    #[test]
    fn test_empty_username() {
        assert_eq!(
            validate_username(""),
            Err(UserValidationError::EmptyUsername)
        );
    }

    #[test]
    fn test_username_too_short() {
        assert_eq!(
            validate_username("ab"),
            Err(UserValidationError::UsernameTooShort(3))
        );
    }

    #[test]
    fn test_username_too_long() {
        let long_username = "a".repeat(51);
        assert_eq!(
            validate_username(&long_username),
            Err(UserValidationError::UsernameTooLong(50))
        );
    }

    #[test]
    fn test_username_invalid_character() {
        assert_eq!(
            validate_username("user@name"),
            Err(UserValidationError::InvalidUsernameCharacter('@'))
        );
    }

    // Email tests
    #[test]
    fn test_valid_emails() {
        assert!(validate_email("john@example.com").is_ok());
        assert!(validate_email("a@b").is_ok());
    }

    #[test]
    fn test_empty_email() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
    }

    #[test]
    fn test_email_too_long() {
        let long_email = format!("{}@example.com", "a".repeat(100));
        assert_eq!(
            validate_email(&long_email),
            Err(UserValidationError::EmailTooLong(100))
        );
    }

    #[test]
    fn test_email_length_counts_characters_not_bytes() {
        // 94 two-byte characters plus "@b.com" is 100 characters but 194
        // bytes; it must still pass.
        let multibyte = format!("{}@b.com", "ü".repeat(94));
        assert_eq!(multibyte.chars().count(), 100);
        assert!(validate_email(&multibyte).is_ok());

        let too_long = format!("{}@b.com", "ü".repeat(95));
        assert_eq!(
            validate_email(&too_long),
            Err(UserValidationError::EmailTooLong(100))
        );
    }

    #[test]
    fn test_email_without_at() {
        assert_eq!(
            validate_email("john.example.com"),
            Err(UserValidationError::MalformedEmail)
        );
    }
}
