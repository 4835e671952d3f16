/// Notes: a user's written approach to a problem.
///
/// A note belongs to exactly one problem and one author. `share_token` is
/// NULL until the author generates a share link; once set it is stable and
/// unique. Starter notes carry the deterministic `starter-note-<user_id>`
/// token and are protected from deletion (see
/// [`crate::service::notes::NoteService`]).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: i64,

    /// Short title of the approach ("Two pointers", "DP over subsets", ...)
    pub approach_title: String,

    /// Body of the note
    pub content: String,

    /// Optional language tag ("rust", "markdown", ...)
    pub language: Option<String>,

    /// Public share token, NULL until generated
    pub share_token: Option<String>,

    pub problem_id: i64,
    pub author_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateNote {
    pub approach_title: String,
    pub content: String,
    pub language: Option<String>,
    pub share_token: Option<String>,
    pub problem_id: i64,
    pub author_id: i64,
}

/// A note joined with its problem title, as listed on "my notes".
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuthoredNote {
    pub id: i64,
    pub approach_title: String,
    pub content: String,
    pub language: Option<String>,
    pub problem_id: i64,
    pub problem_title: String,
    pub share_token: Option<String>,
}

impl Note {
    pub async fn create(pool: &PgPool, data: CreateNote) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (approach_title, content, language, share_token, problem_id, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, approach_title, content, language, share_token,
                      problem_id, author_id, created_at, updated_at
            "#,
        )
        .bind(data.approach_title)
        .bind(data.content)
        .bind(data.language)
        .bind(data.share_token)
        .bind(data.problem_id)
        .bind(data.author_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Note>(
            r#"
            SELECT id, approach_title, content, language, share_token,
                   problem_id, author_id, created_at, updated_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_share_token(
        pool: &PgPool,
        share_token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Note>(
            r#"
            SELECT id, approach_title, content, language, share_token,
                   problem_id, author_id, created_at, updated_at
            FROM notes
            WHERE share_token = $1
            "#,
        )
        .bind(share_token)
        .fetch_optional(pool)
        .await
    }

    /// Rewrites title, content, and language; bumps `updated_at`.
    pub async fn update_content(
        pool: &PgPool,
        id: i64,
        approach_title: &str,
        content: &str,
        language: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET approach_title = $2, content = $3, language = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, approach_title, content, language, share_token,
                      problem_id, author_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(approach_title)
        .bind(content)
        .bind(language)
        .fetch_one(pool)
        .await
    }

    /// Sets the share token exactly once; a second call is a no-op.
    ///
    /// Returns the number of rows changed, so the caller can tell whether
    /// its token won or an existing one survived.
    pub async fn set_share_token(
        pool: &PgPool,
        id: i64,
        share_token: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notes
            SET share_token = $2, updated_at = NOW()
            WHERE id = $1 AND (share_token IS NULL OR share_token = '')
            "#,
        )
        .bind(id)
        .bind(share_token)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All notes under a problem, oldest first.
    pub async fn list_by_problem(pool: &PgPool, problem_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Note>(
            r#"
            SELECT id, approach_title, content, language, share_token,
                   problem_id, author_id, created_at, updated_at
            FROM notes
            WHERE problem_id = $1
            ORDER BY id
            "#,
        )
        .bind(problem_id)
        .fetch_all(pool)
        .await
    }

    /// A user's notes joined with their problem titles, newest first.
    pub async fn list_by_author(
        pool: &PgPool,
        author_id: i64,
    ) -> Result<Vec<AuthoredNote>, sqlx::Error> {
        sqlx::query_as::<_, AuthoredNote>(
            r#"
            SELECT n.id, n.approach_title, n.content, n.language,
                   n.problem_id, p.title AS problem_title, n.share_token
            FROM notes n
            JOIN problems p ON p.id = n.problem_id
            WHERE n.author_id = $1
            ORDER BY n.id DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(pool)
        .await
    }
}
