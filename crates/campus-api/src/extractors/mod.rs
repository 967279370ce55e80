//! Axum extractors for request handling
//!
//! Custom extractors for sessions, validated bodies and typed path parameters.

mod auth;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use path::{
    ApiPath, CommunityIdPath, CommunityMemberPath, CourseIdPath, EnrollmentIdPath,
    InvitationIdPath, InvitationTokenPath, NotificationIdPath, SlugPath,
};
pub use validated::{OptionalValidatedJson, ValidatedJson, ValidatedQuery};
