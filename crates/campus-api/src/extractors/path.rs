//! Path parameter extractors
//!
//! Identifiers in paths are UUIDs; malformed ones are rejected with a 400
//! before any handler runs.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;

use crate::response::ApiError;

/// Path extractor that reports failures in the API error format
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(ApiPath(inner))
    }
}

#[derive(Debug, Deserialize)]
pub struct CommunityIdPath {
    pub community_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CommunityMemberPath {
    pub community_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CourseIdPath {
    pub course_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentIdPath {
    pub enrollment_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct InvitationIdPath {
    pub invitation_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct NotificationIdPath {
    pub notification_id: Uuid,
}

/// Invitation tokens are opaque strings, not UUIDs
#[derive(Debug, Deserialize)]
pub struct InvitationTokenPath {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct SlugPath {
    pub slug: String,
}
