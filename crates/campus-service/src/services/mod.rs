//! Service layer - application use cases
//!
//! Each service borrows the shared [`ServiceContext`].

mod auth;
mod checkout;
mod community;
mod context;
mod course;
mod enrollment;
mod error;
mod invitation;
mod lesson;
mod membership;
mod notification;
mod policy;
mod space;
mod webhook;

pub use auth::{AuthCallback, AuthService, DEFAULT_POST_LOGIN_PATH};
pub use checkout::CheckoutService;
pub use community::CommunityService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use course::CourseService;
pub use enrollment::EnrollmentService;
pub use error::{ServiceError, ServiceResult};
pub use invitation::{InvitationService, RedeemOutcome};
pub use lesson::LessonService;
pub use membership::{JoinOutcome, MembershipService};
pub use notification::NotificationService;
pub use policy::PolicyService;
pub use space::SpaceService;
pub use webhook::{WebhookOutcome, WebhookService};
