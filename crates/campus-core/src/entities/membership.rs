//! Membership entity - a user's place in a community

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::MembershipRole;

/// Membership entity (junction between Profile and Community)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(community_id: Uuid, user_id: Uuid, role: MembershipRole) -> Self {
        Self {
            community_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    /// Plain member, as granted by payment-driven and open joins
    pub fn member(community_id: Uuid, user_id: Uuid) -> Self {
        Self::new(community_id, user_id, MembershipRole::Member)
    }
}
