//! # NoteHub Shared Library
//!
//! Domain layer shared by the NoteHub API server (and any future binaries):
//!
//! - `auth`: password hashing (Argon2id) and bearer tokens (HS256 JWT)
//! - `db`: PostgreSQL pool and embedded migrations
//! - `models`: users, problems, notes with their sqlx CRUD
//! - `service`: user directory, note sharing & provisioning, problem catalog
//!
//! HTTP concerns (routing, DTOs, status mapping) live in `notehub-api`.

pub mod auth;
pub mod db;
pub mod models;
pub mod service;

/// Current version of the NoteHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
