/// User registration and lookup.
///
/// Registration is the one place passwords are hashed and the trigger for
/// starter-content provisioning. Uniqueness is checked username-first, then
/// email (the first violated check wins); a concurrent insert slipping past
/// both checks is caught by the database constraints and mapped to the same
/// duplicate errors.
use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::password::{self, PasswordError};
use crate::models::user::{CreateUser, User};
use crate::service::notes::{NoteError, NoteService};

use super::violated_constraint;

/// Error type for user directory operations
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("username is already taken")]
    DuplicateUsername,

    #[error("email is already in use")]
    DuplicateEmail,

    #[error("user not found with username: {0}")]
    NotFound(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("starter provisioning failed: {0}")]
    Provisioning(#[source] NoteError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Input accepted by [`UserDirectory::register`]. The password is raw; it
/// is hashed inside the directory and never stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct UserDirectory {
    db: PgPool,
    notes: NoteService,
}

impl UserDirectory {
    pub fn new(db: PgPool, notes: NoteService) -> Self {
        Self { db, notes }
    }

    /// Registers a new user and provisions their starter content.
    ///
    /// # Errors
    ///
    /// - [`UserError::DuplicateUsername`] if the username is taken
    /// - [`UserError::DuplicateEmail`] if the email is in use
    /// - [`UserError::Provisioning`] if starter content could not be
    ///   created (the user row itself is already committed at that point)
    pub async fn register(&self, new_user: NewUser) -> Result<User, UserError> {
        if User::username_exists(&self.db, &new_user.username).await? {
            return Err(UserError::DuplicateUsername);
        }
        if User::email_exists(&self.db, &new_user.email).await? {
            return Err(UserError::DuplicateEmail);
        }

        let password_hash = password::hash_password(&new_user.password)?;

        let created = User::create(
            &self.db,
            CreateUser {
                username: new_user.username,
                email: new_user.email,
                password_hash,
            },
        )
        .await;

        let user = match created {
            Ok(user) => user,
            // Lost a race past the explicit checks; report it the same way.
            Err(e) => {
                return Err(match violated_constraint(&e).as_deref() {
                    Some("users_username_key") => UserError::DuplicateUsername,
                    Some("users_email_key") => UserError::DuplicateEmail,
                    _ => UserError::Database(e),
                });
            }
        };

        info!(user_id = user.id, username = %user.username, "user registered");

        if let Err(e) = self.notes.ensure_starter_content(&user).await {
            warn!(user_id = user.id, error = %e, "starter provisioning failed");
            return Err(UserError::Provisioning(e));
        }

        Ok(user)
    }

    /// Loads a user by exact username.
    pub async fn load_by_username(&self, username: &str) -> Result<User, UserError> {
        User::find_by_username(&self.db, username)
            .await?
            .ok_or_else(|| UserError::NotFound(username.to_string()))
    }
}
