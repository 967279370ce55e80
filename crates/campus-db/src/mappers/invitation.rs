//! Invitation model -> entity mapper

use campus_core::{DomainError, Invitation};

use super::parse_column;
use crate::models::InvitationModel;

impl TryFrom<InvitationModel> for Invitation {
    type Error = DomainError;

    fn try_from(model: InvitationModel) -> Result<Self, Self::Error> {
        Ok(Invitation {
            id: model.id,
            community_id: model.community_id,
            email: model.email,
            token: model.token,
            role: parse_column("invitation role", &model.role)?,
            invited_by: model.invited_by,
            created_at: model.created_at,
            expires_at: model.expires_at,
            accepted_at: model.accepted_at,
        })
    }
}
