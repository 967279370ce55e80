//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AddMemberRequest, CheckoutRequest, CompleteLessonRequest, CreateCommunityRequest,
    CreateCourseRequest, CreateInvitationRequest, CreateLessonRequest, CreateSpaceRequest,
    NotificationQuery, PublishCourseRequest, UpdateMemberRoleRequest,
};

pub use responses::{
    CheckoutResponse, CommunityResponse, CommunitySummary, CourseResponse, EnrollmentResponse,
    HealthChecks, HealthResponse, InvitationCreatedResponse, InvitationPreviewResponse,
    InvitationResponse, InvitationStatus, JoinResponse, LessonProgressResponse, LessonResponse,
    MemberResponse, NotificationResponse, ReadinessResponse, RedeemResponse, SpaceResponse,
    WebhookResponse,
};
