/// Session-cookie authentication for Axum
///
/// Login hands the client a signed session token in the [`SESSION_COOKIE`]
/// cookie, scoped to [`COOKIE_PATH`] and marked `HttpOnly` and `Secure`.
/// [`session_auth_middleware`] reads that cookie on every protected request,
/// validates the token and adds an [`AuthContext`] to the request extensions.
/// There is no server-side session store: a request is authenticated exactly
/// when it carries a valid, unexpired token.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use todoback_shared::auth::middleware::{session_auth_middleware, AuthContext};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     auth.user_id.to_string()
/// }
///
/// let secret = "a-signing-secret-of-at-least-32-bytes!!".to_string();
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(move |req, next| {
///         session_auth_middleware(secret.clone(), req, next)
///     }));
/// ```

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session_id";

/// Path the session cookie is scoped to
pub const COOKIE_PATH: &str = "/api/v1";

/// Authentication context added to request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

/// Error type for session authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No session cookie on the request
    #[error("missing session cookie")]
    MissingCredentials,

    /// Session token failed validation
    #[error("{0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

/// Builds the cookie that delivers a session token to the client
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path(COOKIE_PATH)
        .http_only(true)
        .secure(true)
        .build()
}

/// Builds an empty, already expired session cookie for logout
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = session_cookie(String::new());
    cookie.make_removal();
    cookie
}

/// Validates the session cookie in `jar`
pub fn authenticate(jar: &CookieJar, secret: &str) -> Result<AuthContext, AuthError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingCredentials)?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("session expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("invalid issuer".to_string()),
        _ => AuthError::InvalidToken("invalid session token".to_string()),
    })?;

    Ok(AuthContext { user_id: claims.sub })
}

/// Session authentication middleware
///
/// Short-circuits with `401 Unauthorized` before the handler runs when the
/// cookie is missing, has a bad signature, uses a different algorithm or has
/// expired.
pub async fn session_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let jar = CookieJar::from_headers(req.headers());

    let auth_context = authenticate(&jar, &secret).map_err(|e| {
        tracing::debug!(error = %e, path = %req.uri().path(), "Rejected unauthenticated request");
        e
    })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
