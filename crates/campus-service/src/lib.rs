//! # campus-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! Services are thin borrowers over a [`ServiceContext`]; each takes the
//! caller explicitly and routes every community-scoped check through
//! [`PolicyService`].

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use services::{
    AuthCallback, AuthService, CheckoutService, CommunityService, CourseService,
    EnrollmentService, InvitationService, JoinOutcome, LessonService, MembershipService,
    NotificationService, PolicyService, RedeemOutcome, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SpaceService, WebhookOutcome, WebhookService,
};
