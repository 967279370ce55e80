//! Test fixtures and data generators
//!
//! Request bodies the tests send and the response shapes they read back.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique across runs against the same database
pub fn unique_suffix() -> u64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    millis * 1000 + COUNTER.fetch_add(1, Ordering::SeqCst) % 1000
}

#[derive(Debug, Serialize)]
pub struct CreateCommunityRequest {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

impl CreateCommunityRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            slug: format!("community-{suffix}"),
            name: format!("Community {suffix}"),
            description: Some("An integration test community".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityResponse {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub creator_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: String,
}

impl CreateCourseRequest {
    pub fn free() -> Self {
        Self::priced(0, "XOF")
    }

    pub fn priced(price: i64, currency: &str) -> Self {
        Self {
            title: format!("Course {}", unique_suffix()),
            description: None,
            price,
            currency: currency.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    pub community_id: Option<Uuid>,
    pub price: i64,
    pub currency: String,
    pub published: bool,
}

#[derive(Debug, Serialize)]
pub struct PublishCourseRequest {
    pub published: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateLessonRequest {
    pub title: String,
    pub position: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResponse {
    pub id: Uuid,
    pub course_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonRequest {
    pub lesson_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgressResponse {
    pub completed_lessons: i64,
    pub total_lessons: i64,
}

#[derive(Debug, Default, Serialize)]
pub struct CreateInvitationRequest {
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationCreatedResponse {
    pub id: Uuid,
    pub token: String,
    pub link: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct InvitationPreviewResponse {
    pub status: String,
    pub community: Option<CommunitySummary>,
}

#[derive(Debug, Deserialize)]
pub struct CommunitySummary {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub success: bool,
    pub community_slug: String,
    pub joined: bool,
    pub auto_enrolled: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub joined: bool,
    pub auto_enrolled: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub user_id: Uuid,
    pub role: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub read: bool,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
