//! # Todoback Shared Library
//!
//! Domain types, persistence and business rules used by the Todoback API
//! server.
//!
//! ## Module Organization
//!
//! - `models`: Entities and request DTOs
//! - `patch`: Partial-update merge utility
//! - `repository`: Storage traits with PostgreSQL and in-memory implementations
//! - `service`: Per-entity use cases on top of the repositories
//! - `auth`: JWT, password hashing and session-cookie authentication
//! - `db`: Connection pool and embedded migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod patch;
pub mod repository;
pub mod service;

/// Current version of the Todoback shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
