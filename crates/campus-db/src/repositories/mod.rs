//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in campus-core.
//! Each repository handles database operations for a specific domain entity.

mod community;
mod course;
mod enrollment;
mod error;
mod invitation;
mod lesson;
mod membership;
mod notification;
mod profile;
mod space;

pub use community::PgCommunityRepository;
pub use course::PgCourseRepository;
pub use enrollment::PgEnrollmentRepository;
pub use invitation::PgInvitationRepository;
pub use lesson::PgLessonRepository;
pub use membership::PgMembershipRepository;
pub use notification::PgNotificationRepository;
pub use profile::PgProfileRepository;
pub use space::PgSpaceRepository;
