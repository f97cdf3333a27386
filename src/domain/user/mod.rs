//! User domain
//!
//! This module provides the user entity, status enumeration, validation, and
//! the repository trait that storage backends implement.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserStatus};
pub use repository::{UserPatch, UserRepository};
pub use validation::{validate_email, validate_username, UserValidationError};
