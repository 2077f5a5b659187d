//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::Denial;
use quill_core::error::{DomainError, RepoError};
use quill_core::ports::AuthError;
use quill_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden,
    Conflict(String),
    Internal(String),
    Validation(Vec<String>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
        }
    }
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} not found"))
    }

    /// Problem document for this error.
    pub fn problem(&self) -> ErrorResponse {
        let status = self.status_code();
        let title = status.canonical_reason().unwrap_or("Error");
        match self {
            AppError::Validation(errors) => ErrorResponse::validation(errors.clone()),
            AppError::Internal(_) | AppError::Forbidden => ErrorResponse::new(status.as_u16(), title),
            AppError::NotFound(detail)
            | AppError::BadRequest(detail)
            | AppError::Unauthorized(detail)
            | AppError::Conflict(detail) => {
                ErrorResponse::new(status.as_u16(), title).with_detail(detail)
            }
        }
    }

    /// Render the problem document, tagged with the request id and path when known.
    pub fn to_problem_response(&self, request: Option<(&str, &str)>) -> HttpResponse {
        let mut problem = self.problem();
        if let Some((request_id, path)) = request {
            problem = problem.with_request(request_id, path);
        }

        HttpResponse::build(self.status_code()).json(problem)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }

        self.to_problem_response(None)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Validation(vec![err.to_string()])
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => {
                tracing::debug!("Constraint violation: {}", msg);
                AppError::Conflict("Resource already exists".to_string())
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::NotFound => AppError::NotFound("Resource not found".to_string()),
            Denial::Forbidden => AppError::Forbidden,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Unauthorized("Invalid credentials".into()),
            AuthError::TokenExpired => AppError::Unauthorized(
                "Your authentication token has expired. Please login again.".into(),
            ),
            AuthError::InvalidToken(msg) => AppError::Unauthorized(msg),
            AuthError::MissingAuth => AppError::Unauthorized(
                "Provide a Bearer token or the session cookie.".into(),
            ),
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_mapping() {
        assert_eq!(
            AppError::from(Denial::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(Denial::Forbidden).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_constraint_is_conflict() {
        let err = AppError::from(RepoError::Constraint("users_email_key".into()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.problem().detail.as_deref(), Some("Resource already exists"));
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let err = AppError::from(RepoError::Query("syntax error at SELECT".into()));
        let problem = err.problem();
        assert_eq!(problem.status, 500);
        assert!(problem.detail.is_none());
    }

    #[test]
    fn test_validation_keeps_every_message() {
        let err = AppError::Validation(vec!["a".into(), "b".into()]);
        let problem = err.problem();
        assert_eq!(problem.status, 422);
        assert_eq!(problem.errors, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let err = AppError::from(AuthError::TokenExpired);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
