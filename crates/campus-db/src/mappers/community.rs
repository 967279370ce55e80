//! Community and space model -> entity mappers

use campus_core::{Community, DomainError, Space};

use super::parse_column;
use crate::models::{CommunityModel, SpaceModel};

impl From<CommunityModel> for Community {
    fn from(model: CommunityModel) -> Self {
        Community {
            id: model.id,
            slug: model.slug,
            name: model.name,
            description: model.description,
            creator_id: model.creator_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl TryFrom<SpaceModel> for Space {
    type Error = DomainError;

    fn try_from(model: SpaceModel) -> Result<Self, Self::Error> {
        Ok(Space {
            id: model.id,
            community_id: model.community_id,
            name: model.name,
            kind: parse_column("space kind", &model.kind)?,
            position: model.position,
            created_at: model.created_at,
        })
    }
}
