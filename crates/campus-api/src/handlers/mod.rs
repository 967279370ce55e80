//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod auth;
pub mod checkout;
pub mod communities;
pub mod courses;
pub mod health;
pub mod invitations;
pub mod notifications;

use crate::response::ApiError;

/// Fallback for paths no route claims
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
