//! Policy service
//!
//! Loads the caller's relation to a community and asks the core policy
//! function for a decision.

use campus_core::{authorize, Action, Caller, Community, PlatformRole, ResourceContext};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Policy service for community-scoped access control
pub struct PolicyService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PolicyService<'a> {
    /// Create a new PolicyService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a community or fail with not-found
    #[instrument(skip(self))]
    pub async fn community(&self, community_id: Uuid) -> ServiceResult<Community> {
        self.ctx
            .community_repo()
            .find_by_id(community_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Community", community_id.to_string()))
    }

    /// Platform role of the caller; profiles that do not exist yet count as students
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn platform_role(&self, caller: &Caller) -> ServiceResult<PlatformRole> {
        Ok(self
            .ctx
            .profile_repo()
            .role_of(caller.user_id)
            .await?
            .unwrap_or_default())
    }

    /// Build the resource context for `caller` against a community
    #[instrument(skip(self, community, caller), fields(community_id = %community.id, user_id = %caller.user_id))]
    pub async fn context_for(
        &self,
        community: &Community,
        caller: &Caller,
    ) -> ServiceResult<ResourceContext> {
        let membership = self
            .ctx
            .membership_repo()
            .find(community.id, caller.user_id)
            .await?
            .map(|m| m.role);

        Ok(ResourceContext {
            owner_id: community.creator_id,
            membership,
            platform_role: self.platform_role(caller).await?,
        })
    }

    /// Check a decided context and return an error if denied
    pub fn check(caller: &Caller, resource: &ResourceContext, action: Action) -> ServiceResult<()> {
        if authorize(caller, resource, action).is_allowed() {
            return Ok(());
        }
        debug!(user_id = %caller.user_id, action = action.as_str(), "Policy denied action");
        Err(ServiceError::permission_denied(action.as_str()))
    }

    /// Require `action` on a community for `caller`
    #[instrument(skip(self, community, caller), fields(community_id = %community.id, action = action.as_str()))]
    pub async fn require(
        &self,
        community: &Community,
        caller: &Caller,
        action: Action,
    ) -> ServiceResult<()> {
        let resource = self.context_for(community, caller).await?;
        Self::check(caller, &resource, action)
    }
}
