//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use campus_core::{
    Community, Course, CourseProgress, Enrollment, Invitation, Lesson, Membership, Notification,
    Space,
};

use super::responses::{
    CommunityResponse, CommunitySummary, CourseResponse, EnrollmentResponse,
    InvitationCreatedResponse, InvitationResponse, LessonProgressResponse, LessonResponse,
    MemberResponse, NotificationResponse, SpaceResponse,
};

// ============================================================================
// Invitation Mappers
// ============================================================================

impl InvitationCreatedResponse {
    pub fn new(invitation: &Invitation, site_url: &str) -> Self {
        Self {
            id: invitation.id,
            token: invitation.token.clone(),
            link: invitation.link(site_url),
            role: invitation.role,
            email: invitation.email.clone(),
            expires_at: invitation.expires_at,
        }
    }
}

impl InvitationResponse {
    pub fn new(invitation: &Invitation, site_url: &str) -> Self {
        Self {
            id: invitation.id,
            email: invitation.email.clone(),
            role: invitation.role,
            link: invitation.link(site_url),
            created_at: invitation.created_at,
            expires_at: invitation.expires_at,
            accepted_at: invitation.accepted_at,
            expired: invitation.is_expired(),
        }
    }
}

// ============================================================================
// Community Mappers
// ============================================================================

impl From<&Community> for CommunityResponse {
    fn from(community: &Community) -> Self {
        Self {
            id: community.id,
            slug: community.slug.clone(),
            name: community.name.clone(),
            description: community.description.clone(),
            creator_id: community.creator_id,
            created_at: community.created_at,
        }
    }
}

impl From<Community> for CommunityResponse {
    fn from(community: Community) -> Self {
        Self::from(&community)
    }
}

impl From<Community> for CommunitySummary {
    fn from(community: Community) -> Self {
        Self {
            name: community.name,
            slug: community.slug,
        }
    }
}

impl From<&Space> for SpaceResponse {
    fn from(space: &Space) -> Self {
        Self {
            id: space.id,
            community_id: space.community_id,
            name: space.name.clone(),
            kind: space.kind,
            position: space.position,
            created_at: space.created_at,
        }
    }
}

impl From<&Membership> for MemberResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            community_id: membership.community_id,
            user_id: membership.user_id,
            role: membership.role,
            joined_at: membership.joined_at,
        }
    }
}

// ============================================================================
// Course / Enrollment Mappers
// ============================================================================

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            community_id: course.community_id,
            title: course.title.clone(),
            description: course.description.clone(),
            price: course.price,
            currency: course.currency.clone(),
            published: course.published,
            created_at: course.created_at,
        }
    }
}

impl From<&Lesson> for LessonResponse {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            course_id: lesson.course_id,
            title: lesson.title.clone(),
            position: lesson.position,
        }
    }
}

impl From<&Enrollment> for EnrollmentResponse {
    fn from(enrollment: &Enrollment) -> Self {
        Self {
            id: enrollment.id,
            user_id: enrollment.user_id,
            course_id: enrollment.course_id,
            status: enrollment.status,
            amount: enrollment.amount,
            currency: enrollment.currency.clone(),
            created_at: enrollment.created_at,
            updated_at: enrollment.updated_at,
        }
    }
}

impl From<CourseProgress> for LessonProgressResponse {
    fn from(progress: CourseProgress) -> Self {
        Self {
            completed_lessons: progress.completed,
            total_lessons: progress.total,
        }
    }
}

// ============================================================================
// Notification Mappers
// ============================================================================

impl From<&Notification> for NotificationResponse {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            title: notification.title.clone(),
            body: notification.body.clone(),
            link: notification.link.clone(),
            created_at: notification.created_at,
            read: notification.is_read(),
        }
    }
}
