/// Middleware for the API server.
///
/// - `auth`: the pass-through authentication gate and the `CurrentUser`
///   extractor routes use to demand authentication
pub mod auth;
