/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use todoback_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url()).await?;
/// let state = AppState::new(pool, config);
/// let app = todoback_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::NoCacheLayer, routes};
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use todoback_shared::{
    auth::middleware::{session_auth_middleware, AuthError},
    repository::Repositories,
    service::Services,
};
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Version prefix of every resource route
pub const API_PREFIX: &str = "/api/v1";

/// Per-request deadline
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, absent when running on in-memory storage
    pub db: Option<PgPool>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Use cases for every entity family
    pub services: Services,
}

impl AppState {
    /// Creates application state backed by PostgreSQL
    pub fn new(db: PgPool, config: Config) -> Self {
        Self::from_repositories(config, Repositories::postgres(db.clone()), Some(db))
    }

    /// Creates application state backed by empty in-memory repositories
    pub fn in_memory(config: Config) -> Self {
        Self::from_repositories(config, Repositories::in_memory(), None)
    }

    /// Creates application state over an arbitrary set of repositories
    pub fn from_repositories(config: Config, repositories: Repositories, db: Option<PgPool>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            services: Services::new(repositories),
        }
    }

    /// Gets the secret used to sign and verify session tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                              # public
/// └── /api/v1/
///     ├── POST   /auth/register                # public
///     ├── POST   /auth/login                   # public
///     ├── GET    /auth/logout                  # public
///     ├── POST   /users                        # public
///     ├── GET    /users                        # session
///     ├── GET|PATCH|DELETE /users/:id
///     ├── GET    /users/:id/teams
///     ├── POST|GET /tasks
///     ├── GET|PATCH|DELETE /tasks/:id
///     ├── POST|GET /todos
///     ├── GET|PATCH|DELETE /todos/:id
///     ├── POST|GET /teams
///     ├── GET|PATCH|DELETE /teams/:id
///     ├── GET    /teams/:id/users
///     └── PUT|DELETE /teams/:team_id/users/:user_id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. Timeout (tower-http TimeoutLayer, 15 s)
/// 2. Logging (tower-http TraceLayer)
/// 3. Cache suppression on GET/PATCH responses under `/api/v1`
/// 4. Session authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    // Reachable without a session
    let public_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", get(routes::auth::logout))
        .route("/users", post(routes::users::create_user));

    // Require a valid session cookie
    let protected_routes = Router::new()
        .route("/users", get(routes::users::list_users))
        .route(
            "/users/:id",
            get(routes::users::get_user)
                .patch(routes::users::patch_user)
                .delete(routes::users::delete_user)
                .options(routes::users::user_options),
        )
        .route("/users/:id/teams", get(routes::users::list_user_teams))
        .route(
            "/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::patch_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/todos",
            post(routes::todos::create_todo).get(routes::todos::list_todos),
        )
        .route(
            "/todos/:id",
            get(routes::todos::get_todo)
                .patch(routes::todos::patch_todo)
                .delete(routes::todos::delete_todo),
        )
        .route(
            "/teams",
            post(routes::teams::create_team).get(routes::teams::list_teams),
        )
        .route(
            "/teams/:id",
            get(routes::teams::get_team)
                .patch(routes::teams::patch_team)
                .delete(routes::teams::delete_team),
        )
        .route("/teams/:id/users", get(routes::teams::list_team_users))
        .route(
            "/teams/:team_id/users/:user_id",
            put(routes::teams::add_team_member).delete(routes::teams::remove_team_member),
        )
        .layer(middleware::from_fn_with_state(state.clone(), session_layer));

    let v1_routes = public_routes
        .merge(protected_routes)
        .layer(NoCacheLayer);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest(API_PREFIX, v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

/// Session authentication layer
///
/// Validates the session cookie with the configured secret and injects an
/// `AuthContext` into the request extensions.
async fn session_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    session_auth_middleware(state.jwt_secret().to_string(), req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig, JwtConfig};
    use axum::{body::Body, http::StatusCode};
    use tower::Service as _;

    fn config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: String::new(),
                name: "todoback".to_string(),
                url_override: None,
                max_connections: 10,
                run_migrations: false,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
        }
    }

    #[test]
    fn test_in_memory_state_has_no_pool() {
        let state = AppState::in_memory(config());
        assert!(state.db.is_none());
        assert_eq!(state.jwt_secret(), "test-secret-key-at-least-32-bytes-long");
    }

    #[tokio::test]
    async fn test_protected_route_requires_session() {
        let mut app = build_router(AppState::in_memory(config()));

        let response = app
            .call(
                Request::builder()
                    .uri("/api/v1/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let mut app = build_router(AppState::in_memory(config()));

        let response = app
            .call(
                Request::builder()
                    .uri("/api/v2/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
