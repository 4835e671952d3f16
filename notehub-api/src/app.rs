/// Application state and router builder.
///
/// The whole dependency graph is assembled here, once, at process start:
/// pool → services → state → router. No registry, no ambient wiring.
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                                  # public liveness
/// └── /api/v1/                                 # authentication gate applied
///     ├── /auth/signup|login|refresh           # public
///     ├── /problems                            # GET public, POST authenticated
///     ├── /problems/:id                        # GET public
///     ├── /problems/:id/notes[...]             # authenticated, author-checked
///     ├── /notes/shared/:token                 # public read
///     └── /notes/mine, /notes/me               # authenticated
/// ```
///
/// The gate never rejects; handlers that need an identity take the
/// [`crate::middleware::auth::CurrentUser`] extractor.
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use notehub_shared::auth::jwt::TokenService;
use notehub_shared::service::{notes::NoteService, problems::ProblemService, users::UserDirectory};

use crate::config::Config;

/// Shared application state, cloned into every handler via `State`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Bearer-token issuance and validation
    pub tokens: TokenService,

    /// Registration and username lookup
    pub users: UserDirectory,

    /// Note CRUD, sharing, starter provisioning
    pub notes: NoteService,

    /// Problem catalog
    pub problems: ProblemService,
}

impl AppState {
    /// Wires up the service graph from a pool and loaded configuration.
    pub fn new(db: PgPool, config: Config) -> Self {
        let tokens = TokenService::new(config.jwt.secret.clone(), config.jwt.lifetime_secs);
        let notes = NoteService::new(db.clone());
        let users = UserDirectory::new(db.clone(), notes.clone());
        let problems = ProblemService::new(db.clone());

        Self {
            db,
            config: Arc::new(config),
            tokens,
            users,
            notes,
            problems,
        }
    }
}

/// Builds the complete axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let problem_routes = Router::new()
        .route(
            "/",
            get(routes::problems::list_problems).post(routes::problems::create_problem),
        )
        .route("/:id", get(routes::problems::get_problem))
        .route("/:problem_id/notes", post(routes::notes::create_note))
        .route(
            "/:problem_id/notes/:note_id",
            put(routes::notes::update_note).delete(routes::notes::delete_note),
        )
        .route(
            "/:problem_id/notes/:note_id/share",
            post(routes::notes::share_note),
        );

    let note_routes = Router::new()
        .route("/shared/:token", get(routes::notes::get_shared_note))
        .route("/mine", get(routes::notes::my_notes))
        .route("/me", get(routes::notes::current_user_profile));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/problems", problem_routes)
        .nest("/notes", note_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::authenticate,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state))
        .with_state(state)
}

/// CORS from configuration: permissive when `*` is listed, otherwise the
/// explicit origin allowlist.
fn cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.api.cors_origins;

    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

