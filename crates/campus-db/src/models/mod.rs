//! Database models - SQLx-compatible structs for PostgreSQL tables

mod community;
mod course;
mod enrollment;
mod invitation;
mod membership;
mod notification;
mod profile;

pub use community::{CommunityModel, SpaceModel};
pub use course::{CourseModel, LessonModel, ProgressCountsModel};
pub use enrollment::EnrollmentModel;
pub use invitation::InvitationModel;
pub use membership::MembershipModel;
pub use notification::NotificationModel;
pub use profile::ProfileModel;
