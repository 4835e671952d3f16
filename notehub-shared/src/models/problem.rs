/// Coding problems, the parent resource for notes.
///
/// `title` is globally unique; besides normal catalog semantics, that
/// constraint is what makes the shared starter problem a singleton under
/// concurrent registration.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Problem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateProblem {
    pub title: String,
    pub description: String,
}

impl Problem {
    pub async fn create(pool: &PgPool, data: CreateProblem) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Problem>(
            r#"
            INSERT INTO problems (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Problem>(
            "SELECT id, title, description, created_at FROM problems WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Exact-title lookup, used by the starter-problem find-or-create.
    pub async fn find_by_title(pool: &PgPool, title: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Problem>(
            "SELECT id, title, description, created_at FROM problems WHERE title = $1",
        )
        .bind(title)
        .fetch_optional(pool)
        .await
    }

    /// All problems, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Problem>(
            "SELECT id, title, description, created_at FROM problems ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }
}
