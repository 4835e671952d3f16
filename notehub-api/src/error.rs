/// Error handling for the API server.
///
/// Domain services raise typed failures; this module is the single place
/// they are mapped onto HTTP responses, so every endpoint shares one error
/// shape:
///
/// ```json
/// { "error": "forbidden", "message": "...", "details": [...] }
/// ```
///
/// Status taxonomy: validation problems and uniqueness violations are 400,
/// bad credentials 401, non-author mutation and starter-note deletion 403,
/// missing resources 404, everything uncategorized 500.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use notehub_shared::auth::jwt::TokenError;
use notehub_shared::auth::password::PasswordError;
use notehub_shared::service::notes::NoteError;
use notehub_shared::service::problems::ProblemError;
use notehub_shared::service::users::UserError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400): malformed input, duplicates, mismatched resources
    BadRequest(String),

    /// Bad request (400) with per-field validation details
    Validation(Vec<FieldError>),

    /// Unauthorized (401): missing or bad credentials
    Unauthorized(String),

    /// Forbidden (403): authenticated but not allowed
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500); message is logged, not exposed
    Internal(String),
}

/// One field that failed request validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable code ("bad_request", "forbidden", ...)
    pub error: String,

    /// Human-readable message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            ApiError::Validation(errors) => write!(f, "validation failed: {} errors", errors.len()),
            ApiError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "not found: {}", msg),
            ApiError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Internal(msg) => {
                // Log the detail, answer with a generic body.
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(details)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateUsername => {
                ApiError::BadRequest("Username is already taken".to_string())
            }
            UserError::DuplicateEmail => {
                ApiError::BadRequest("Email is already in use".to_string())
            }
            UserError::NotFound(username) => {
                ApiError::NotFound(format!("User not found with username: {}", username))
            }
            UserError::Password(e) => ApiError::Internal(e.to_string()),
            UserError::Provisioning(e) => ApiError::Internal(e.to_string()),
            UserError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<NoteError> for ApiError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::ProblemNotFound(_) | NoteError::NoteNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            NoteError::ShareLinkNotFound => ApiError::NotFound(err.to_string()),
            NoteError::ProblemMismatch => ApiError::BadRequest(err.to_string()),
            NoteError::NotAuthor => {
                ApiError::Forbidden("You are not the author of this note".to_string())
            }
            NoteError::StarterProtected => ApiError::Forbidden(err.to_string()),
            NoteError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ProblemError> for ApiError {
    fn from(err: ProblemError) -> Self {
        match err {
            ProblemError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ProblemError::DuplicateTitle => ApiError::BadRequest(err.to_string()),
            ProblemError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed(_) => ApiError::Unauthorized("Invalid token".to_string()),
            TokenError::Signing(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(format!("database error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_taxonomy() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Validation(vec![]), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_duplicates_map_to_400() {
        let err: ApiError = UserError::DuplicateUsername.into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err: ApiError = UserError::DuplicateEmail.into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err: ApiError = ProblemError::DuplicateTitle.into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_starter_deletion_and_non_author_map_to_403() {
        let err: ApiError = NoteError::StarterProtected.into();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);

        let err: ApiError = NoteError::NotAuthor.into();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = ApiError::Internal("connection string with password".to_string());
        let display = err.to_string();
        assert!(display.contains("internal error"));

        // The response body carries only the generic message.
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
