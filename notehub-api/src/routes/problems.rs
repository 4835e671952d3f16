/// Problem catalog endpoints.
///
/// # Endpoints
///
/// - `GET /api/v1/problems` - list (public)
/// - `GET /api/v1/problems/:id` - detail with notes (public)
/// - `POST /api/v1/problems` - create (authenticated)
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use notehub_shared::models::problem::{CreateProblem, Problem};

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::auth::CurrentUser,
    routes::notes::NoteResponse,
};

#[derive(Debug, Deserialize, Validate)]
pub struct ProblemCreateRequest {
    #[validate(length(min = 1, max = 255, message = "Title cannot be blank"))]
    pub title: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct ProblemResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Problem> for ProblemResponse {
    fn from(problem: Problem) -> Self {
        Self {
            id: problem.id,
            title: problem.title,
            description: problem.description,
            created_at: problem.created_at,
        }
    }
}

/// Problem detail: the problem plus all notes attached to it.
#[derive(Debug, Serialize)]
pub struct ProblemDetailResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub notes: Vec<NoteResponse>,
}

/// `GET /api/v1/problems`
pub async fn list_problems(State(state): State<AppState>) -> ApiResult<Json<Vec<ProblemResponse>>> {
    let problems = state.problems.list().await?;
    Ok(Json(problems.into_iter().map(Into::into).collect()))
}

/// `GET /api/v1/problems/:id`
pub async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProblemDetailResponse>> {
    let (problem, notes) = state.problems.get_with_notes(id).await?;

    Ok(Json(ProblemDetailResponse {
        id: problem.id,
        title: problem.title,
        description: problem.description,
        notes: notes.into_iter().map(Into::into).collect(),
    }))
}

/// `POST /api/v1/problems`
///
/// Requires authentication; a duplicate title is 400.
pub async fn create_problem(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(req): Json<ProblemCreateRequest>,
) -> ApiResult<(StatusCode, Json<ProblemResponse>)> {
    req.validate()?;

    let problem = state
        .problems
        .create(CreateProblem {
            title: req.title,
            description: req.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(problem.into())))
}
