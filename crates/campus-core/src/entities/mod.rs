//! Domain entities - core business objects

mod community;
mod course;
mod enrollment;
mod invitation;
mod membership;
mod notification;
mod profile;
mod space;

pub use community::{validate_slug, Community};
pub use course::{Course, CourseProgress, Lesson, LessonProgress};
pub use enrollment::{Enrollment, EnrollmentStatus, PAYMENT_PROVIDER};
pub use invitation::{
    generate_invitation_token, Consumption, Invitation, INVITATION_TOKEN_LEN, INVITATION_TTL_DAYS,
};
pub use membership::Membership;
pub use notification::{Notification, NotificationKind};
pub use profile::Profile;
pub use space::{Space, SpaceKind};
