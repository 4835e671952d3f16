/// Note endpoints: CRUD under a problem, sharing, and the caller's own
/// notes and profile.
///
/// # Endpoints
///
/// - `POST   /api/v1/problems/:problem_id/notes` - create (authenticated)
/// - `PUT    /api/v1/problems/:problem_id/notes/:note_id` - update (author)
/// - `DELETE /api/v1/problems/:problem_id/notes/:note_id` - delete (author;
///   starter notes always refuse with 403)
/// - `POST   /api/v1/problems/:problem_id/notes/:note_id/share` - mint or
///   return the note's share token (author)
/// - `GET    /api/v1/notes/shared/:token` - public share-link read
/// - `GET    /api/v1/notes/mine` - the caller's notes (authenticated)
/// - `GET    /api/v1/notes/me` - the caller's profile (authenticated)
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use notehub_shared::models::note::{AuthoredNote, Note};
use notehub_shared::service::notes::{is_starter_token, NoteInput};

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::auth::CurrentUser,
    routes::auth::UserResponse,
};

#[derive(Debug, Deserialize, Validate)]
pub struct NoteCreateRequest {
    #[validate(length(min = 1, max = 255, message = "Approach title cannot be blank"))]
    pub approach_title: String,

    #[validate(length(min = 1, message = "Content cannot be blank"))]
    pub content: String,

    #[validate(length(max = 50, message = "Language must not exceed 50 characters"))]
    pub language: Option<String>,
}

impl From<NoteCreateRequest> for NoteInput {
    fn from(req: NoteCreateRequest) -> Self {
        Self {
            approach_title: req.approach_title,
            content: req.content,
            language: req.language,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: i64,
    pub approach_title: String,
    pub content: String,
    pub language: Option<String>,
    pub share_token: Option<String>,
    pub problem_id: i64,
    pub author_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            approach_title: note.approach_title,
            content: note.content,
            language: note.language,
            share_token: note.share_token,
            problem_id: note.problem_id,
            author_id: note.author_id,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// A note as listed on "my notes": joined with its problem title and
/// flagged when it is the protected starter note.
#[derive(Debug, Serialize)]
pub struct MyNoteResponse {
    pub id: i64,
    pub approach_title: String,
    pub content: String,
    pub language: Option<String>,
    pub problem_id: i64,
    pub problem_title: String,
    pub share_token: Option<String>,
    pub is_starter: bool,
}

impl From<AuthoredNote> for MyNoteResponse {
    fn from(note: AuthoredNote) -> Self {
        let is_starter = note.share_token.as_deref().is_some_and(is_starter_token);
        Self {
            id: note.id,
            approach_title: note.approach_title,
            content: note.content,
            language: note.language,
            problem_id: note.problem_id,
            problem_title: note.problem_title,
            share_token: note.share_token,
            is_starter,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub share_token: String,

    /// Canonical public path for the share link
    pub share_url: String,
}

/// `POST /api/v1/problems/:problem_id/notes`
pub async fn create_note(
    State(state): State<AppState>,
    Path(problem_id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<NoteCreateRequest>,
) -> ApiResult<(StatusCode, Json<NoteResponse>)> {
    req.validate()?;

    let note = state.notes.create_note(problem_id, req.into(), &user).await?;
    Ok((StatusCode::CREATED, Json(note.into())))
}

/// `PUT /api/v1/problems/:problem_id/notes/:note_id`
pub async fn update_note(
    State(state): State<AppState>,
    Path((problem_id, note_id)): Path<(i64, i64)>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<NoteCreateRequest>,
) -> ApiResult<Json<NoteResponse>> {
    req.validate()?;

    let note = state
        .notes
        .update_note(problem_id, note_id, req.into(), &user)
        .await?;
    Ok(Json(note.into()))
}

/// `DELETE /api/v1/problems/:problem_id/notes/:note_id`
pub async fn delete_note(
    State(state): State<AppState>,
    Path((problem_id, note_id)): Path<(i64, i64)>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<StatusCode> {
    state.notes.delete_note(problem_id, note_id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/problems/:problem_id/notes/:note_id/share`
///
/// Mints the note's share token on first call; afterwards always answers
/// with the same token. `problem_id` only scopes the URL - the share token
/// belongs to the note.
pub async fn share_note(
    State(state): State<AppState>,
    Path((_problem_id, note_id)): Path<(i64, i64)>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<ShareResponse>> {
    let share_token = state.notes.generate_share_token(note_id, &user).await?;
    let share_url = format!("/api/v1/notes/shared/{share_token}");

    Ok(Json(ShareResponse {
        share_token,
        share_url,
    }))
}

/// `GET /api/v1/notes/shared/:token`
///
/// Public, read-only; no authorship check by design.
pub async fn get_shared_note(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<NoteResponse>> {
    let note = state.notes.resolve_by_share_token(&token).await?;
    Ok(Json(note.into()))
}

/// `GET /api/v1/notes/mine`
pub async fn my_notes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<MyNoteResponse>>> {
    let notes = state.notes.notes_by_author(&user).await?;
    Ok(Json(notes.into_iter().map(Into::into).collect()))
}

/// `GET /api/v1/notes/me`
pub async fn current_user_profile(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}
