//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("Community not found: {0}")]
    CommunityNotFound(String),

    #[error("Space not found: {0}")]
    SpaceNotFound(Uuid),

    #[error("Course not found: {0}")]
    CourseNotFound(Uuid),

    #[error("Lesson not found: {0}")]
    LessonNotFound(Uuid),

    #[error("Invitation not found")]
    InvitationNotFound,

    #[error("Member not found in community")]
    MembershipNotFound,

    #[error("Enrollment not found: {0}")]
    EnrollmentNotFound(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Uuid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("Course is not available for purchase")]
    CourseNotPurchasable,

    #[error("Course is not free")]
    CourseNotFree,

    // =========================================================================
    // Authentication / Authorization Errors
    // =========================================================================
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invitation was issued for a different email address")]
    InvitationEmailMismatch,

    #[error("An active enrollment is required")]
    EnrollmentRequired,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Slug already in use")]
    SlugTaken,

    #[error("Already enrolled in this course")]
    AlreadyEnrolled,

    #[error("Invitation token already exists")]
    InvitationTokenExists,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Invitation has expired")]
    InvitationExpired,

    #[error("Cannot remove the community creator")]
    CannotRemoveCreator,

    // =========================================================================
    // External Provider Errors
    // =========================================================================
    #[error("Payment verification failed: {0}")]
    PaymentVerificationFailed(String),

    #[error("Payment gateway error: {0}")]
    PaymentGatewayError(String),

    #[error("Identity provider error: {0}")]
    IdentityProviderError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",
            Self::CommunityNotFound(_) => "UNKNOWN_COMMUNITY",
            Self::SpaceNotFound(_) => "UNKNOWN_SPACE",
            Self::CourseNotFound(_) => "UNKNOWN_COURSE",
            Self::LessonNotFound(_) => "UNKNOWN_LESSON",
            Self::InvitationNotFound => "UNKNOWN_INVITATION",
            Self::MembershipNotFound => "UNKNOWN_MEMBER",
            Self::EnrollmentNotFound(_) => "UNKNOWN_ENROLLMENT",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidSlug(_) => "INVALID_SLUG",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
            Self::CourseNotPurchasable => "COURSE_NOT_PURCHASABLE",
            Self::CourseNotFree => "COURSE_NOT_FREE",

            // Authentication / Authorization
            Self::Unauthenticated => "UNAUTHORIZED",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::InvitationEmailMismatch => "INVITATION_EMAIL_MISMATCH",
            Self::EnrollmentRequired => "ENROLLMENT_REQUIRED",

            // Conflict
            Self::SlugTaken => "SLUG_TAKEN",
            Self::AlreadyEnrolled => "ALREADY_ENROLLED",
            Self::InvitationTokenExists => "INVITATION_TOKEN_EXISTS",

            // Business Rules
            Self::InvitationExpired => "INVITATION_EXPIRED",
            Self::CannotRemoveCreator => "CANNOT_REMOVE_CREATOR",

            // External
            Self::PaymentVerificationFailed(_) => "PAYMENT_VERIFICATION_FAILED",
            Self::PaymentGatewayError(_) => "PAYMENT_GATEWAY_ERROR",
            Self::IdentityProviderError(_) => "IDENTITY_PROVIDER_ERROR",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProfileNotFound(_)
                | Self::CommunityNotFound(_)
                | Self::SpaceNotFound(_)
                | Self::CourseNotFound(_)
                | Self::LessonNotFound(_)
                | Self::InvitationNotFound
                | Self::MembershipNotFound
                | Self::EnrollmentNotFound(_)
                | Self::NotificationNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidSlug(_)
                | Self::InvalidRole(_)
                | Self::InvalidCurrency(_)
                | Self::CourseNotPurchasable
                | Self::CourseNotFree
                | Self::CannotRemoveCreator
        )
    }

    /// Check if the caller has no session at all
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_) | Self::InvitationEmailMismatch | Self::EnrollmentRequired
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SlugTaken | Self::AlreadyEnrolled | Self::InvitationTokenExists
        )
    }

    /// Check if the resource existed but is no longer usable
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::InvitationExpired)
    }

    /// Check if an upstream provider rejected or failed the request
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Self::PaymentVerificationFailed(_)
                | Self::PaymentGatewayError(_)
                | Self::IdentityProviderError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::CourseNotFound(Uuid::nil());
        assert_eq!(err.code(), "UNKNOWN_COURSE");

        let err = DomainError::PermissionDenied("issue invitation".to_string());
        assert_eq!(err.code(), "PERMISSION_DENIED");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::InvitationNotFound.is_not_found());
        assert!(DomainError::CommunityNotFound("demo".to_string()).is_not_found());
        assert!(!DomainError::SlugTaken.is_not_found());
    }

    #[test]
    fn test_is_authorization() {
        assert!(DomainError::InvitationEmailMismatch.is_authorization());
        assert!(DomainError::EnrollmentRequired.is_authorization());
        assert!(!DomainError::Unauthenticated.is_authorization());
        assert!(DomainError::Unauthenticated.is_unauthenticated());
    }

    #[test]
    fn test_expired_and_external() {
        assert!(DomainError::InvitationExpired.is_expired());
        assert!(DomainError::PaymentVerificationFailed("amount".into()).is_external());
        assert!(!DomainError::InvitationExpired.is_external());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidSlug("A B".to_string());
        assert_eq!(err.to_string(), "Invalid slug: A B");

        let err = DomainError::InvitationExpired;
        assert_eq!(err.to_string(), "Invitation has expired");
    }
}
