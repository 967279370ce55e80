//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output with camelCase keys.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use campus_core::{EnrollmentStatus, MembershipRole, NotificationKind, SpaceKind};

// ============================================================================
// Invitation Responses
// ============================================================================

/// Returned to the issuer; carries the shareable link
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationCreatedResponse {
    pub id: Uuid,
    pub token: String,
    pub link: String,
    pub role: MembershipRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// Invitation as listed to community admins
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: MembershipRole,
    pub link: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub expired: bool,
}

/// State of a token as seen from the public invitation page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Valid,
    Expired,
    Invalid,
}

/// Name and slug shown on the invitation page
#[derive(Debug, Clone, Serialize)]
pub struct CommunitySummary {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvitationPreviewResponse {
    pub status: InvitationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<CommunitySummary>,
}

impl InvitationPreviewResponse {
    pub fn invalid() -> Self {
        Self {
            status: InvitationStatus::Invalid,
            community: None,
        }
    }
}

/// Result of redeeming an invitation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub success: bool,
    pub community_slug: String,
    pub joined: bool,
    pub auto_enrolled: u64,
}

// ============================================================================
// Checkout / Enrollment Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub payment_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub status: EnrollmentStatus,
    pub amount: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Acknowledgement sent back to the payment provider
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgressResponse {
    pub completed_lessons: i64,
    pub total_lessons: i64,
}

// ============================================================================
// Community Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityResponse {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceResponse {
    pub id: Uuid,
    pub community_id: Uuid,
    pub name: String,
    pub kind: SpaceKind,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub joined_at: DateTime<Utc>,
}

/// Result of joining a community
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub joined: bool,
    pub auto_enrolled: u64,
}

// ============================================================================
// Course Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    pub community_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub position: i32,
}

// ============================================================================
// Notification Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_uses_camel_case() {
        let json = serde_json::to_value(LessonProgressResponse {
            completed_lessons: 2,
            total_lessons: 5,
        })
        .unwrap();
        assert_eq!(json["completedLessons"], 2);
        assert_eq!(json["totalLessons"], 5);
    }

    #[test]
    fn test_invalid_preview_omits_community() {
        let json = serde_json::to_value(InvitationPreviewResponse::invalid()).unwrap();
        assert_eq!(json["status"], "invalid");
        assert!(json.get("community").is_none());
    }

    #[test]
    fn test_checkout_response_key() {
        let json = serde_json::to_value(CheckoutResponse {
            payment_url: "https://pay.example/x".into(),
        })
        .unwrap();
        assert_eq!(json["paymentUrl"], "https://pay.example/x");
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready(true);
        assert_eq!(ready.status, "ready");
        let not_ready = ReadinessResponse::ready(false);
        assert_eq!(not_ready.checks.database, "unhealthy");
    }
}
