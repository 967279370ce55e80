//! Authorization policy and page access rules

pub mod access;
mod authorize;

pub use access::AccessDecision;
pub use authorize::{authorize, Action, Decision, ResourceContext};
