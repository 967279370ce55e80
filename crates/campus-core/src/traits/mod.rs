//! Ports implemented by the infrastructure crates

mod gateways;
mod repositories;

pub use gateways::{
    GatewayResult, IdentityProvider, IdentityUser, PaymentGateway, PaymentRequest,
    VerifiedTransaction,
};
pub use repositories::{
    CommunityRepository, CourseRepository, EnrollmentRepository, InvitationRepository,
    LessonRepository, MembershipRepository, NotificationRepository, ProfileRepository,
    RepoResult, SpaceRepository,
};
