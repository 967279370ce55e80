//! Errors surfaced by service operations.
//!
//! Domain and application errors pass through untouched so the API layer can
//! keep their codes; the remaining variants cover checks made in services.

use campus_common::{domain_status, AppError};
use campus_core::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Not allowed to {action}")]
    PermissionDenied { action: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// `action` is the policy action name, e.g. `ISSUE_INVITATION`
    pub fn permission_denied(action: impl Into<String>) -> Self {
        Self::PermissionDenied {
            action: action.into(),
        }
    }

    /// No session on an operation that needs one
    pub fn unauthorized() -> Self {
        Self::Domain(DomainError::Unauthenticated)
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status and stable error code, in one place
    fn classify(&self) -> (u16, &str) {
        match self {
            Self::Domain(e) => (domain_status(e), e.code()),
            Self::App(e) => (e.status_code(), e.error_code()),
            Self::NotFound { .. } => (404, "NOT_FOUND"),
            Self::PermissionDenied { .. } => (403, "PERMISSION_DENIED"),
            Self::Validation(_) => (400, "VALIDATION_ERROR"),
            Self::Conflict(_) => (409, "CONFLICT"),
            Self::Internal(_) => (500, "INTERNAL_ERROR"),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.classify().0
    }

    pub fn error_code(&self) -> &str {
        self.classify().1
    }

    /// True for failures the caller cannot fix (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::PermissionDenied { .. } => AppError::InsufficientPermissions,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_course_is_404() {
        let err = ServiceError::not_found("Course", "123");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Course not found: 123");
    }

    #[test]
    fn policy_denial_is_403() {
        let err = ServiceError::permission_denied("ISSUE_INVITATION");
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "PERMISSION_DENIED");
    }

    #[test]
    fn domain_errors_keep_their_status() {
        assert_eq!(ServiceError::unauthorized().status_code(), 401);
        assert_eq!(ServiceError::from(DomainError::InvitationExpired).status_code(), 410);
        assert_eq!(
            ServiceError::from(DomainError::PaymentVerificationFailed("short".into())).status_code(),
            502
        );
        assert_eq!(ServiceError::from(DomainError::AlreadyEnrolled).status_code(), 409);
    }

    #[test]
    fn only_internal_failures_are_server_errors() {
        assert!(ServiceError::internal("boom").is_server_error());
        assert!(!ServiceError::validation("bad").is_server_error());
        assert!(!ServiceError::conflict("slug taken").is_server_error());
    }

    #[test]
    fn service_error_converts_to_app_error() {
        let app_err: AppError = ServiceError::not_found("Community", "456").into();
        assert_eq!(app_err.status_code(), 404);

        let app_err: AppError = ServiceError::permission_denied("DELETE_COMMUNITY").into();
        assert_eq!(app_err.status_code(), 403);
    }
}
