/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`. Every error is rendered as a status code
/// plus a plain-text body holding the message; there is no JSON error
/// envelope. Internal errors are logged and replaced by a generic message.
///
/// # Example
///
/// ```
/// use todoback_api::error::{ApiError, ApiResult};
///
/// async fn handler(id: &str) -> ApiResult<String> {
///     let id = uuid::Uuid::parse_str(id)
///         .map_err(|e| ApiError::BadRequest(format!("invalid id {}: {}", id, e)))?;
///     Ok(id.to_string())
/// }
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use todoback_shared::{
    auth::{jwt::JwtError, middleware::AuthError},
    models::FilterError,
    repository::RepositoryError,
    service::ServiceError,
};
use validator::ValidationErrors;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400): malformed JSON, invalid id, failed validation,
    /// dangling reference
    BadRequest(String),

    /// Unauthorized (401): missing or invalid session, wrong credentials
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409): e.g. duplicate email or membership
    Conflict(String),

    /// Internal server error (500)
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg,
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                "internal server error".to_string()
            }
        };

        (status, message).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ApiError::NotFound(err.to_string()),
            RepositoryError::AlreadyExists => ApiError::Conflict(err.to_string()),
            RepositoryError::Database(e) => ApiError::InternalError(format!("Database error: {}", e)),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Repository(e) => e.into(),
            ServiceError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            ServiceError::MultipleMatches => ApiError::InternalError(err.to_string()),
            ServiceError::Password(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!(
            "cannot unmarshal request object: {}",
            rejection.body_text()
        ))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| match &error.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        details.sort();

        ApiError::BadRequest(details.join("; "))
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::InternalError(format!("Token error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("entities not found".to_string());
        assert_eq!(err.to_string(), "Not found: entities not found");
    }

    #[test]
    fn test_repository_error_mapping() {
        assert_eq!(
            ApiError::from(RepositoryError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(RepositoryError::AlreadyExists).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_mapping() {
        let err = ApiError::from(ServiceError::InvalidCredentials);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Unauthorized: wrong credentials (email or password)");
    }

    #[test]
    fn test_validation_errors_become_bad_request() {
        #[derive(Validate)]
        struct Body {
            #[validate(email(message = "invalid email format"))]
            email: String,
        }

        let errors = Body {
            email: "nope".to_string(),
        }
        .validate()
        .unwrap_err();

        match ApiError::from(errors) {
            ApiError::BadRequest(msg) => assert_eq!(msg, "email: invalid email format"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::InternalError("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"internal server error");
    }
}
