//! Space service

use campus_core::{Action, Caller, Space};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{CreateSpaceRequest, SpaceResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::policy::PolicyService;

/// Space service
pub struct SpaceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SpaceService<'a> {
    /// Create a new SpaceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a space; appended after existing spaces unless a position is given
    #[instrument(skip(self, caller, request), fields(user_id = %caller.user_id))]
    pub async fn create(
        &self,
        caller: &Caller,
        community_id: Uuid,
        request: CreateSpaceRequest,
    ) -> ServiceResult<SpaceResponse> {
        let policy = PolicyService::new(self.ctx);
        let community = policy.community(community_id).await?;
        policy.require(&community, caller, Action::ManageSpaces).await?;

        let position = match request.position {
            Some(position) => position,
            None => {
                let existing = self.ctx.space_repo().find_by_community(community.id).await?;
                existing.iter().map(|s| s.position + 1).max().unwrap_or(0)
            }
        };

        let space = Space::new(community.id, request.name.trim().to_string(), request.kind, position);
        self.ctx.space_repo().create(&space).await?;

        info!(space_id = %space.id, community_id = %community.id, "Space created");
        Ok(SpaceResponse::from(&space))
    }

    /// List spaces of a community
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn list(&self, caller: &Caller, community_id: Uuid) -> ServiceResult<Vec<SpaceResponse>> {
        let policy = PolicyService::new(self.ctx);
        let community = policy.community(community_id).await?;
        policy.require(&community, caller, Action::ViewSpaces).await?;

        let spaces = self.ctx.space_repo().find_by_community(community.id).await?;
        Ok(spaces.iter().map(SpaceResponse::from).collect())
    }
}
