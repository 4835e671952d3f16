/// Note CRUD, share tokens, and starter-content provisioning.
///
/// Two kinds of share token exist:
///
/// - **Generated** tokens: random 32-hex-char strings minted on demand by
///   the note's author. Unguessable, stable once minted, and they grant
///   public read access through `GET /notes/shared/:token`.
/// - **Starter** tokens: the deterministic `starter-note-<user_id>` tag on
///   the onboarding note every account receives. A note carrying a starter
///   token can be edited but never deleted.
///
/// Starter provisioning is idempotent and race-safe: the shared starter
/// problem is found-or-created under the `problems_title_key` unique
/// constraint (losing the insert race means retrying the lookup), and the
/// starter note insert treats a `notes_share_token_key` conflict as
/// "someone else already provisioned this user".
use sqlx::PgPool;
use tracing::{debug, info};

use crate::models::note::{AuthoredNote, CreateNote, Note};
use crate::models::problem::{CreateProblem, Problem};
use crate::models::user::User;

use super::violated_constraint;

/// Reserved prefix marking starter notes. Notes whose share token starts
/// with this cannot be deleted.
pub const STARTER_TOKEN_PREFIX: &str = "starter-note-";

/// Well-known title of the problem shared by all starter notes. Created at
/// most once, on the first registration.
pub const STARTER_PROBLEM_TITLE: &str = "Welcome to NoteHub: Your Coding Notes Hub";

const STARTER_PROBLEM_DESCRIPTION: &str =
    "Get started by creating your first coding note! This starter problem is shared by all users.";

const STARTER_NOTE_TITLE: &str = "How to use NoteHub";

const STARTER_NOTE_CONTENT: &str = "Welcome! Use NoteHub to save, organize, and share your \
coding notes and solutions. Start by creating a new problem and adding your own notes.";

/// Error type for note operations
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("problem not found with id: {0}")]
    ProblemNotFound(i64),

    #[error("note not found with id: {0}")]
    NoteNotFound(i64),

    #[error("no note found for this share link")]
    ShareLinkNotFound,

    #[error("note does not belong to the specified problem")]
    ProblemMismatch,

    #[error("you are not the author of this note")]
    NotAuthor,

    #[error("the starter note cannot be deleted; you can edit it, but not delete it")]
    StarterProtected,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The deterministic starter share token for a user.
pub fn starter_token_for(user_id: i64) -> String {
    format!("{STARTER_TOKEN_PREFIX}{user_id}")
}

/// Whether a share token marks a protected starter note.
pub fn is_starter_token(token: &str) -> bool {
    token.starts_with(STARTER_TOKEN_PREFIX)
}

/// Mints a random, unguessable share token (32 hex chars, no relation to
/// the note's id or content).
fn mint_share_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Fields accepted when creating or updating a note.
#[derive(Debug, Clone)]
pub struct NoteInput {
    pub approach_title: String,
    pub content: String,
    pub language: Option<String>,
}

#[derive(Clone)]
pub struct NoteService {
    db: PgPool,
}

impl NoteService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Creates a note under an existing problem, authored by `author`.
    pub async fn create_note(
        &self,
        problem_id: i64,
        input: NoteInput,
        author: &User,
    ) -> Result<Note, NoteError> {
        let problem = Problem::find_by_id(&self.db, problem_id)
            .await?
            .ok_or(NoteError::ProblemNotFound(problem_id))?;

        let note = Note::create(
            &self.db,
            CreateNote {
                approach_title: input.approach_title,
                content: input.content,
                language: input.language,
                share_token: None,
                problem_id: problem.id,
                author_id: author.id,
            },
        )
        .await?;

        info!(note_id = note.id, problem_id, author_id = author.id, "note created");
        Ok(note)
    }

    /// Rewrites a note's title, content, and language.
    ///
    /// The note must exist under the given problem and the caller must be
    /// its author. Starter notes are editable.
    pub async fn update_note(
        &self,
        problem_id: i64,
        note_id: i64,
        input: NoteInput,
        user: &User,
    ) -> Result<Note, NoteError> {
        let note = self.load_owned_note(problem_id, note_id, user).await?;

        let updated = Note::update_content(
            &self.db,
            note.id,
            &input.approach_title,
            &input.content,
            input.language.as_deref(),
        )
        .await?;

        Ok(updated)
    }

    /// Deletes a note, unless it is a protected starter note.
    pub async fn delete_note(
        &self,
        problem_id: i64,
        note_id: i64,
        user: &User,
    ) -> Result<(), NoteError> {
        let note = self.load_owned_note(problem_id, note_id, user).await?;

        // The starter note survives even its own author.
        if note.share_token.as_deref().is_some_and(is_starter_token) {
            return Err(NoteError::StarterProtected);
        }

        Note::delete(&self.db, note.id).await?;
        info!(note_id = note.id, "note deleted");
        Ok(())
    }

    /// All notes authored by `user`, joined with their problem titles.
    pub async fn notes_by_author(&self, user: &User) -> Result<Vec<AuthoredNote>, NoteError> {
        Ok(Note::list_by_author(&self.db, user.id).await?)
    }

    /// Returns the note's share token, minting it on first call.
    ///
    /// Only the author may share a note. Once a token exists, every
    /// subsequent call returns the same token.
    pub async fn generate_share_token(
        &self,
        note_id: i64,
        user: &User,
    ) -> Result<String, NoteError> {
        let note = Note::find_by_id(&self.db, note_id)
            .await?
            .ok_or(NoteError::NoteNotFound(note_id))?;

        if note.author_id != user.id {
            return Err(NoteError::NotAuthor);
        }

        if let Some(token) = note.share_token.filter(|t| !t.is_empty()) {
            return Ok(token);
        }

        let token = mint_share_token();
        let updated = Note::set_share_token(&self.db, note_id, &token).await?;
        if updated > 0 {
            debug!(note_id, "share token minted");
            return Ok(token);
        }

        // Lost a concurrent mint; the winner's token is the stable one.
        Note::find_by_id(&self.db, note_id)
            .await?
            .and_then(|n| n.share_token)
            .ok_or(NoteError::NoteNotFound(note_id))
    }

    /// Public share-link resolution. No authorship check by design.
    pub async fn resolve_by_share_token(&self, token: &str) -> Result<Note, NoteError> {
        Note::find_by_share_token(&self.db, token)
            .await?
            .ok_or(NoteError::ShareLinkNotFound)
    }

    /// Ensures `user` owns a starter note attached to the shared starter
    /// problem. Idempotent; called on every successful registration.
    pub async fn ensure_starter_content(&self, user: &User) -> Result<(), NoteError> {
        let token = starter_token_for(user.id);

        if let Some(existing) = Note::find_by_share_token(&self.db, &token).await? {
            if existing.author_id == user.id {
                debug!(user_id = user.id, "starter content already provisioned");
                return Ok(());
            }
        }

        let problem = self.find_or_create_starter_problem().await?;

        let created = Note::create(
            &self.db,
            CreateNote {
                approach_title: STARTER_NOTE_TITLE.to_string(),
                content: STARTER_NOTE_CONTENT.to_string(),
                language: Some("markdown".to_string()),
                share_token: Some(token),
                problem_id: problem.id,
                author_id: user.id,
            },
        )
        .await;

        match created {
            Ok(note) => {
                info!(user_id = user.id, note_id = note.id, "starter note provisioned");
                Ok(())
            }
            // A concurrent call for the same user already inserted it.
            Err(e) if violated_constraint(&e).as_deref() == Some("notes_share_token_key") => {
                debug!(user_id = user.id, "starter note provisioned concurrently");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find-or-create of the single shared starter problem.
    ///
    /// Simultaneous first registrations can both miss the lookup; the title
    /// unique constraint makes one insert lose, and the loser re-reads the
    /// winner's row.
    async fn find_or_create_starter_problem(&self) -> Result<Problem, NoteError> {
        if let Some(problem) = Problem::find_by_title(&self.db, STARTER_PROBLEM_TITLE).await? {
            return Ok(problem);
        }

        let inserted = Problem::create(
            &self.db,
            CreateProblem {
                title: STARTER_PROBLEM_TITLE.to_string(),
                description: STARTER_PROBLEM_DESCRIPTION.to_string(),
            },
        )
        .await;

        match inserted {
            Ok(problem) => {
                info!(problem_id = problem.id, "starter problem created");
                Ok(problem)
            }
            Err(e) if violated_constraint(&e).as_deref() == Some("problems_title_key") => {
                Problem::find_by_title(&self.db, STARTER_PROBLEM_TITLE)
                    .await?
                    .ok_or_else(|| NoteError::Database(e))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Shared existence/ownership checks for note mutations.
    async fn load_owned_note(
        &self,
        problem_id: i64,
        note_id: i64,
        user: &User,
    ) -> Result<Note, NoteError> {
        let problem = Problem::find_by_id(&self.db, problem_id)
            .await?
            .ok_or(NoteError::ProblemNotFound(problem_id))?;

        let note = Note::find_by_id(&self.db, note_id)
            .await?
            .ok_or(NoteError::NoteNotFound(note_id))?;

        if note.problem_id != problem.id {
            return Err(NoteError::ProblemMismatch);
        }
        if note.author_id != user.id {
            return Err(NoteError::NotAuthor);
        }

        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_token_shape() {
        assert_eq!(starter_token_for(42), "starter-note-42");
        assert_eq!(starter_token_for(1), "starter-note-1");
    }

    #[test]
    fn test_starter_token_detection() {
        assert!(is_starter_token("starter-note-42"));
        assert!(is_starter_token("starter-note-"));
        assert!(!is_starter_token("a1b2c3d4e5f60718293a4b5c6d7e8f90"));
        assert!(!is_starter_token(""));
        assert!(!is_starter_token("note-starter-42"));
    }

    #[test]
    fn test_minted_tokens_are_unguessable_hex() {
        let a = mint_share_token();
        let b = mint_share_token();

        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
        assert!(!is_starter_token(&a));
    }
}
