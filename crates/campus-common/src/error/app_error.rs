//! Application-level errors shared by the service and API crates.

use campus_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Session token failed signature or shape checks
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// HTTP status for a domain error, decided by its classification
pub fn domain_status(e: &DomainError) -> u16 {
    let classes: [(fn(&DomainError) -> bool, u16); 7] = [
        (DomainError::is_not_found, 404),
        (DomainError::is_unauthenticated, 401),
        (DomainError::is_authorization, 403),
        (DomainError::is_validation, 400),
        (DomainError::is_conflict, 409),
        (DomainError::is_expired, 410),
        (DomainError::is_external, 502),
    ];

    classes
        .iter()
        .find(|(matches, _)| matches(e))
        .map_or(500, |(_, status)| *status)
}

impl AppError {
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidToken | Self::TokenExpired => 401,
            Self::InsufficientPermissions => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) | Self::Config(_) => 500,
            Self::Domain(e) => domain_status(e),
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
