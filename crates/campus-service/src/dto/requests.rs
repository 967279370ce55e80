//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Field names are camelCase on the wire.

use campus_core::{MembershipRole, SpaceKind};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Invitation Requests
// ============================================================================

/// Issue an invitation for a community
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationRequest {
    /// Restrict redemption to this exact email
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Role granted on redemption; `member` when omitted
    pub role: Option<MembershipRole>,
}

// ============================================================================
// Checkout / Enrollment Requests
// ============================================================================

/// Start a hosted payment for a course
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub course_id: Uuid,

    /// ISO currency code; the course's own currency when omitted
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
}

/// Mark a lesson as completed
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonRequest {
    pub lesson_id: Uuid,
}

// ============================================================================
// Community Requests
// ============================================================================

/// Create community request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityRequest {
    #[validate(length(min = 3, max = 48, message = "Slug must be 3-48 characters"))]
    pub slug: String,

    #[validate(length(min = 1, max = 100, message = "Community name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Create space request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    #[validate(length(min = 1, max = 100, message = "Space name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    pub kind: SpaceKind,

    pub position: Option<i32>,
}

/// Add a member directly
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: Uuid,

    #[serde(default)]
    pub role: MembershipRole,
}

/// Change a member's role
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMemberRoleRequest {
    pub role: MembershipRole,
}

// ============================================================================
// Course Requests
// ============================================================================

/// Create a course inside a community
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200, message = "Course title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    /// Stored amount: whole units for XOF, cents otherwise
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i64,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
}

/// Publish or unpublish a course
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublishCourseRequest {
    pub published: bool,
}

/// Append a lesson to a course
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 200, message = "Lesson title must be 1-200 characters"))]
    pub title: String,

    #[validate(range(min = 0, message = "Position cannot be negative"))]
    pub position: i32,
}

// ============================================================================
// Notification Requests
// ============================================================================

/// Query parameters for listing notifications
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NotificationQuery {
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

impl NotificationQuery {
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}
