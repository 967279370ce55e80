//! # campus-core
//!
//! Domain layer containing entities, value objects, the authorization policy
//! and the repository / provider traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    generate_invitation_token, validate_slug, Community, Consumption, Course, CourseProgress,
    Enrollment, EnrollmentStatus, Invitation, Lesson, LessonProgress, Membership, Notification,
    NotificationKind, Profile, Space, SpaceKind,
};
pub use error::DomainError;
pub use policy::{authorize, AccessDecision, Action, Decision, ResourceContext};
pub use traits::{
    CommunityRepository, CourseRepository, EnrollmentRepository, GatewayResult,
    IdentityProvider, IdentityUser, InvitationRepository, LessonRepository, MembershipRepository,
    NotificationRepository, PaymentGateway, PaymentRequest, ProfileRepository, RepoResult,
    SpaceRepository, VerifiedTransaction,
};
pub use value_objects::{money, Caller, MembershipRole, PlatformRole};
