//! Response types and error handling for API endpoints
//!
//! Every failure leaves the API as `{ "error": { "code", "message", "details"? } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use campus_common::{domain_status, AppError};
use campus_core::DomainError;
use campus_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// Message returned in place of server-side error details
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),

    #[error("Invalid query parameter: {0}")]
    InvalidQuery(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Authentication required")]
    MissingAuth,

    #[error("Session is invalid or expired")]
    InvalidSession,

    #[error("Resource not found")]
    RouteNotFound,

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    fn classify(&self) -> (u16, &str) {
        match self {
            Self::App(e) => (e.status_code(), e.error_code()),
            Self::Service(e) => (e.status_code(), e.error_code()),
            Self::Domain(e) => (domain_status(e), e.code()),
            Self::Validation(_) => (400, "VALIDATION_ERROR"),
            Self::InvalidPath(_) => (400, "INVALID_PATH_PARAMETER"),
            Self::InvalidQuery(_) => (400, "INVALID_QUERY_PARAMETER"),
            Self::InvalidBody(_) => (400, "INVALID_BODY"),
            Self::MissingAuth => (401, "UNAUTHENTICATED"),
            Self::InvalidSession => (401, "INVALID_SESSION"),
            Self::RouteNotFound => (404, "NOT_FOUND"),
            Self::Internal(_) => (500, "INTERNAL_ERROR"),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.classify().0).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    #[must_use]
    pub fn error_code(&self) -> &str {
        self.classify().1
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::InvalidBody(msg.into())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code().to_string();

        // Server-side details stay in the logs
        let message = if status.is_server_error() {
            error!(error = ?self, status = status.as_u16(), "Server error occurred");
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        let details = if let Self::Validation(errors) = &self {
            Some(serde_json::to_value(errors).unwrap_or_default())
        } else {
            None
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 201 around any response body
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = self.0.into_response();
        *response.status_mut() = StatusCode::CREATED;
        response
    }
}

/// 204
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
