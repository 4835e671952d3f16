/// Problem catalog CRUD.
use sqlx::PgPool;
use tracing::info;

use crate::models::note::Note;
use crate::models::problem::{CreateProblem, Problem};

use super::violated_constraint;

/// Error type for problem operations
#[derive(Debug, thiserror::Error)]
pub enum ProblemError {
    #[error("problem not found with id: {0}")]
    NotFound(i64),

    #[error("a problem with this title already exists")]
    DuplicateTitle,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct ProblemService {
    db: PgPool,
}

impl ProblemService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Problem>, ProblemError> {
        Ok(Problem::list(&self.db).await?)
    }

    /// A problem together with all its notes.
    pub async fn get_with_notes(&self, id: i64) -> Result<(Problem, Vec<Note>), ProblemError> {
        let problem = Problem::find_by_id(&self.db, id)
            .await?
            .ok_or(ProblemError::NotFound(id))?;
        let notes = Note::list_by_problem(&self.db, id).await?;
        Ok((problem, notes))
    }

    pub async fn create(&self, data: CreateProblem) -> Result<Problem, ProblemError> {
        match Problem::create(&self.db, data).await {
            Ok(problem) => {
                info!(problem_id = problem.id, title = %problem.title, "problem created");
                Ok(problem)
            }
            Err(e) if violated_constraint(&e).as_deref() == Some("problems_title_key") => {
                Err(ProblemError::DuplicateTitle)
            }
            Err(e) => Err(e.into()),
        }
    }
}
