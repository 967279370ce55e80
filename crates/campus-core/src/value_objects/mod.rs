//! Value objects - immutable types that represent domain concepts

mod caller;
pub mod money;
mod roles;

pub use caller::Caller;
pub use roles::{MembershipRole, PlatformRole};
