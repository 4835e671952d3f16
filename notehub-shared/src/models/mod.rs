/// Database models and their sqlx CRUD operations.
///
/// - `user`: registered accounts
/// - `problem`: coding problems (the parent resource)
/// - `note`: per-problem notes with optional share tokens
///
/// Models stay free of domain policy: authorship checks, starter-note
/// protection, and provisioning all live in [`crate::service`].
pub mod note;
pub mod problem;
pub mod user;
