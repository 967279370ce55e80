//! Community service

use campus_core::{validate_slug, Action, Caller, Community, DomainError};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{CommunityResponse, CreateCommunityRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::policy::PolicyService;

/// Community service
pub struct CommunityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommunityService<'a> {
    /// Create a new CommunityService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a community; the creator becomes its admin
    #[instrument(skip(self, caller, request), fields(user_id = %caller.user_id, slug = %request.slug))]
    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateCommunityRequest,
    ) -> ServiceResult<CommunityResponse> {
        let role = PolicyService::new(self.ctx).platform_role(caller).await?;
        if !role.can_create_communities() {
            return Err(ServiceError::permission_denied("CREATE_COMMUNITY"));
        }

        validate_slug(&request.slug)?;

        let description = request.description.filter(|d| !d.trim().is_empty());
        let community = Community::new(request.slug, request.name.trim().to_string(), caller.user_id)
            .with_description(description);

        self.ctx.community_repo().create(&community).await?;

        info!(community_id = %community.id, "Community created");
        Ok(community.into())
    }

    /// Public lookup by slug
    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &str) -> ServiceResult<CommunityResponse> {
        let community = self
            .ctx
            .community_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::CommunityNotFound(slug.to_string()))?;

        Ok(community.into())
    }

    /// Delete a community and everything it owns
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn delete(&self, caller: &Caller, community_id: Uuid) -> ServiceResult<()> {
        let policy = PolicyService::new(self.ctx);
        let community = policy.community(community_id).await?;
        policy.require(&community, caller, Action::DeleteCommunity).await?;

        self.ctx.community_repo().delete(community.id).await?;

        info!(community_id = %community.id, slug = %community.slug, "Community deleted");
        Ok(())
    }
}
