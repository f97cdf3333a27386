//! User infrastructure module
//!
//! This module provides the persistence implementations for users (Postgres
//! and in-memory) and the user service that sits on top of them.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
