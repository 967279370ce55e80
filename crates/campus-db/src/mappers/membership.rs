//! Membership model -> entity mapper

use campus_core::{DomainError, Membership};

use super::parse_column;
use crate::models::MembershipModel;

impl TryFrom<MembershipModel> for Membership {
    type Error = DomainError;

    fn try_from(model: MembershipModel) -> Result<Self, Self::Error> {
        Ok(Membership {
            community_id: model.community_id,
            user_id: model.user_id,
            role: parse_column("membership role", &model.role)?,
            joined_at: model.joined_at,
        })
    }
}
