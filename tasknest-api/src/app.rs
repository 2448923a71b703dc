/// Application state and router builder
///
/// # Router
///
/// ```text
/// /api
/// ├── /health                  # liveness (public)
/// ├── /auth
/// │   ├── POST /register       # public
/// │   └── POST /login          # public
/// ├── /profile                 # GET, PUT (authenticated)
/// └── /tasks                   # POST, GET (authenticated)
///     └── /:id                 # GET, PUT, DELETE (authenticated)
/// ```
///
/// Protected routes sit behind the authentication gate; unknown routes
/// fall back to a JSON 404.

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state, cloned per request
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Immutable application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// The token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login));

    let protected_routes = Router::new()
        .route(
            "/api/profile",
            get(routes::profile::get_profile).put(routes::profile::update_profile),
        )
        .route(
            "/api/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/api/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(route_not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Authentication gate, wired to the application state
///
/// Delegates to the shared gate and routes its rejection through the
/// error lookup table so every failure mode shares one response shape.
async fn auth_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    tasknest_shared::auth::middleware::auth_gate(
        state.db.clone(),
        state.jwt_secret().to_string(),
        req,
        next,
    )
    .await
    .map_err(ApiError::from)
}

/// JSON body for unknown routes
async fn route_not_found() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
}
