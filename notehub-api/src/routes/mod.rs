/// API route handlers, organized by resource.
///
/// - `health`: liveness check
/// - `auth`: signup, login, token refresh
/// - `problems`: problem catalog CRUD
/// - `notes`: note CRUD, sharing, "my notes", profile
pub mod auth;
pub mod health;
pub mod notes;
pub mod problems;
