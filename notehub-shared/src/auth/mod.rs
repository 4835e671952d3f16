/// Authentication primitives.
///
/// - [`password`]: Argon2id hashing and verification for stored credentials
/// - [`jwt`]: stateless bearer-token issuance and validation (HS256)
///
/// Both are pure building blocks; the per-request authentication gate that
/// uses them lives in the API crate, and user lookup lives in
/// [`crate::service::users`].
pub mod jwt;
pub mod password;
