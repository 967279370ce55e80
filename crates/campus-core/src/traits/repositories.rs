//! Repository traits (ports) - define the interface for data access
//!
//! The database is the single source of truth. Implementations must let
//! uniqueness constraints decide insert-if-absent races and report the
//! loser as "already exists" instead of an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{
    Community, Course, CourseProgress, Enrollment, Invitation, Lesson, Membership, Notification,
    Profile, Space,
};
use crate::error::DomainError;
use crate::value_objects::{MembershipRole, PlatformRole};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find profile by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Profile>>;

    /// Insert the profile unless one already exists; returns the stored row
    async fn ensure(&self, profile: &Profile) -> RepoResult<Profile>;

    /// Set the email on a profile
    async fn update_email(&self, id: Uuid, email: &str) -> RepoResult<()>;

    /// Platform role of a profile, if it exists
    async fn role_of(&self, id: Uuid) -> RepoResult<Option<PlatformRole>>;
}

// ============================================================================
// Community Repository
// ============================================================================

#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// Find community by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Community>>;

    /// Find community by its unique slug
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Community>>;

    /// Create a community and the creator's admin membership
    async fn create(&self, community: &Community) -> RepoResult<()>;

    /// Delete a community; spaces, courses, invitations and memberships cascade
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Space Repository
// ============================================================================

#[async_trait]
pub trait SpaceRepository: Send + Sync {
    /// Create a new space
    async fn create(&self, space: &Space) -> RepoResult<()>;

    /// List spaces of a community ordered by position
    async fn find_by_community(&self, community_id: Uuid) -> RepoResult<Vec<Space>>;
}

// ============================================================================
// Course Repository
// ============================================================================

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Find course by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Course>>;

    /// Create a new course
    async fn create(&self, course: &Course) -> RepoResult<()>;

    /// Publish or unpublish a course
    async fn set_published(&self, id: Uuid, published: bool) -> RepoResult<()>;

    /// All published, zero-price courses of a community
    async fn find_free_published(&self, community_id: Uuid) -> RepoResult<Vec<Course>>;
}

// ============================================================================
// Lesson Repository
// ============================================================================

#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Find lesson by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Lesson>>;

    /// Create a new lesson
    async fn create(&self, lesson: &Lesson) -> RepoResult<()>;

    /// Record completion; repeated calls keep a single row
    async fn record_completion(&self, user_id: Uuid, lesson_id: Uuid) -> RepoResult<()>;

    /// Completed vs. total lessons of a course for one user
    async fn progress(&self, user_id: Uuid, course_id: Uuid) -> RepoResult<CourseProgress>;
}

// ============================================================================
// Invitation Repository
// ============================================================================

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Create a new invitation
    async fn create(&self, invitation: &Invitation) -> RepoResult<()>;

    /// Resolve an invitation by token.
    ///
    /// Goes through the narrowly scoped privileged lookup keyed only by
    /// the token, since the redeemer is not yet a member.
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Invitation>>;

    /// Find invitation by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Invitation>>;

    /// List invitations of a community, newest first
    async fn find_by_community(&self, community_id: Uuid) -> RepoResult<Vec<Invitation>>;

    /// Delete an invitation
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Stamp an invitation as accepted
    async fn mark_accepted(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<()>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find a membership
    async fn find(&self, community_id: Uuid, user_id: Uuid) -> RepoResult<Option<Membership>>;

    /// Insert unless the (community, user) pair exists.
    ///
    /// Returns `true` only when this call created the row.
    async fn insert_if_absent(&self, membership: &Membership) -> RepoResult<bool>;

    /// List members of a community
    async fn find_by_community(&self, community_id: Uuid) -> RepoResult<Vec<Membership>>;

    /// Change a member's role
    async fn update_role(
        &self,
        community_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> RepoResult<()>;

    /// Remove a member
    async fn delete(&self, community_id: Uuid, user_id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Enrollment Repository
// ============================================================================

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Find enrollment by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Enrollment>>;

    /// The non-cancelled enrollment of a user in a course, if any
    async fn find_current(&self, user_id: Uuid, course_id: Uuid) -> RepoResult<Option<Enrollment>>;

    /// Insert unless a non-cancelled enrollment exists; `true` if created
    async fn create(&self, enrollment: &Enrollment) -> RepoResult<bool>;

    /// Bulk insert, skipping pairs that already have a non-cancelled row.
    ///
    /// Returns the number of rows inserted.
    async fn create_many(&self, enrollments: &[Enrollment]) -> RepoResult<u64>;

    /// Refresh the amount and currency on a pending enrollment
    async fn update_pending_amount(&self, id: Uuid, amount: i64, currency: &str)
        -> RepoResult<()>;

    /// Mark active and record the provider's transaction id.
    ///
    /// Returns `true` when a row matched.
    async fn activate(&self, id: Uuid, provider_transaction_id: &str) -> RepoResult<bool>;

    /// Mark cancelled
    async fn cancel(&self, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Create a new notification
    async fn create(&self, notification: &Notification) -> RepoResult<()>;

    /// Most recent notifications for a user
    async fn find_by_user(&self, user_id: Uuid, limit: i64) -> RepoResult<Vec<Notification>>;

    /// Mark a user's notification as read; `false` if it does not belong to them
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> RepoResult<bool>;
}
