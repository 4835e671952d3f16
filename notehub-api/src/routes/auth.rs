/// Authentication endpoints.
///
/// # Endpoints
///
/// - `POST /api/v1/auth/signup` - register a new account (201)
/// - `POST /api/v1/auth/login` - exchange credentials for a bearer token
/// - `POST /api/v1/auth/refresh` - exchange a still-valid token for a fresh one
///
/// Login failures are deliberately uniform: an unknown username and a wrong
/// password produce the same 401 body.
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use notehub_shared::auth::password;
use notehub_shared::models::user::User;
use notehub_shared::service::users::{NewUser, UserError};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Signup request. Field bounds match the persisted column sizes.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(
        email(message = "Email should be valid"),
        length(max = 100, message = "Email must not exceed 100 characters")
    )]
    pub email: String,

    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    pub password: String,
}

/// Public view of a user account.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username cannot be blank"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password cannot be blank"))]
    pub password: String,
}

/// Token response shared by login and refresh.
#[derive(Debug, Serialize)]
pub struct JwtResponse {
    pub token: String,

    /// Always "Bearer"
    #[serde(rename = "type")]
    pub token_type: String,

    pub id: i64,
    pub username: String,
    pub email: String,
}

impl JwtResponse {
    fn new(token: String, user: User) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// `POST /api/v1/auth/signup`
///
/// Registers the user and provisions their starter note as a side effect.
/// Responds 201 with the user summary; duplicates and field problems are
/// 400.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    let user = state
        .users
        .register(NewUser {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `POST /api/v1/auth/login`
///
/// Verifies credentials and issues a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<JwtResponse>> {
    req.validate()?;

    let user = match state.users.load_by_username(&req.username).await {
        Ok(user) => user,
        Err(UserError::NotFound(_)) => return Err(bad_credentials()),
        Err(e) => return Err(e.into()),
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(bad_credentials());
    }

    let token = state.tokens.issue(&user.username)?;
    tracing::info!(user_id = user.id, username = %user.username, "login succeeded");

    Ok(Json(JwtResponse::new(token, user)))
}

/// `POST /api/v1/auth/refresh`
///
/// Exchanges the presented (still-valid) bearer token for a fresh one with
/// a full lifetime. Expired or malformed tokens are 401 - an expired token
/// cannot be used to keep itself alive.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<JwtResponse>> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("No valid token provided".to_string()))?;

    let verified = state.tokens.verify(token)?;
    if verified.expired {
        return Err(ApiError::Unauthorized("Token expired".to_string()));
    }

    let user = match state.users.load_by_username(&verified.subject).await {
        Ok(user) => user,
        Err(UserError::NotFound(_)) => {
            return Err(ApiError::Unauthorized("Token refresh failed".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let fresh = state.tokens.issue(&user.username)?;
    Ok(Json(JwtResponse::new(fresh, user)))
}

fn bad_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid username or password".to_string())
}
