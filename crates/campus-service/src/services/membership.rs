//! Membership service
//!
//! Owns the join cascade shared by invitation redemption, open joins,
//! direct adds and paid enrollment: an idempotent membership insert, and on
//! a fresh join, active zero-amount enrollments in every published free
//! course of the community.

use campus_core::{
    Action, Caller, DomainError, Enrollment, Membership, MembershipRole, NotificationKind,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{AddMemberRequest, JoinResponse, MemberResponse, UpdateMemberRoleRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notification::NotificationService;
use super::policy::PolicyService;

/// What a join attempt changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinOutcome {
    /// This call created the membership row
    pub created: bool,
    /// Free-course enrollments inserted by the cascade
    pub auto_enrolled: u64,
}

impl From<JoinOutcome> for JoinResponse {
    fn from(outcome: JoinOutcome) -> Self {
        Self {
            joined: outcome.created,
            auto_enrolled: outcome.auto_enrolled,
        }
    }
}

/// Membership service
pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    /// Create a new MembershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Insert the membership unless it exists; `true` when created
    #[instrument(skip(self))]
    pub async fn ensure_member(
        &self,
        community_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> ServiceResult<bool> {
        let existing = self.ctx.membership_repo().find(community_id, user_id).await?;
        if existing.is_some() {
            return Ok(false);
        }

        let created = self
            .ctx
            .membership_repo()
            .insert_if_absent(&Membership::new(community_id, user_id, role))
            .await?;

        if created {
            info!(
                community_id = %community_id,
                user_id = %user_id,
                role = role.as_str(),
                "Membership created"
            );
        }

        Ok(created)
    }

    /// Join with the free-course cascade
    #[instrument(skip(self))]
    pub async fn join_with_cascade(
        &self,
        community_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> ServiceResult<JoinOutcome> {
        let created = self.ensure_member(community_id, user_id, role).await?;
        if !created {
            return Ok(JoinOutcome::default());
        }

        let auto_enrolled = self.enroll_free_courses(community_id, user_id).await;
        Ok(JoinOutcome {
            created,
            auto_enrolled,
        })
    }

    /// Bulk-enroll into every published free course. Errors are logged only.
    async fn enroll_free_courses(&self, community_id: Uuid, user_id: Uuid) -> u64 {
        let courses = match self.ctx.course_repo().find_free_published(community_id).await {
            Ok(courses) => courses,
            Err(e) => {
                warn!(community_id = %community_id, user_id = %user_id, error = %e, "Free course lookup failed");
                return 0;
            }
        };

        let enrollments: Vec<Enrollment> = courses
            .iter()
            .map(|course| Enrollment::free(user_id, course.id, course.currency.clone()))
            .collect();

        match self.ctx.enrollment_repo().create_many(&enrollments).await {
            Ok(inserted) => {
                if inserted > 0 {
                    info!(community_id = %community_id, user_id = %user_id, inserted, "Auto-enrolled in free courses");
                }
                inserted
            }
            Err(e) => {
                warn!(community_id = %community_id, user_id = %user_id, error = %e, "Free course auto-enrollment failed");
                0
            }
        }
    }

    /// Join an open community as a plain member
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn join(&self, caller: &Caller, community_id: Uuid) -> ServiceResult<JoinResponse> {
        let community = PolicyService::new(self.ctx).community(community_id).await?;

        let outcome = self
            .join_with_cascade(community.id, caller.user_id, MembershipRole::Member)
            .await?;

        if outcome.created {
            NotificationService::new(self.ctx)
                .notify(
                    caller.user_id,
                    NotificationKind::CommunityJoined,
                    format!("Welcome to {}", community.name),
                    "You are now a member of this community.",
                    Some(format!("/c/{}", community.slug)),
                )
                .await;
        }

        Ok(outcome.into())
    }

    /// List members of a community
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn list(&self, caller: &Caller, community_id: Uuid) -> ServiceResult<Vec<MemberResponse>> {
        let policy = PolicyService::new(self.ctx);
        let community = policy.community(community_id).await?;
        policy.require(&community, caller, Action::ViewSpaces).await?;

        let members = self.ctx.membership_repo().find_by_community(community_id).await?;
        Ok(members.iter().map(MemberResponse::from).collect())
    }

    /// Add a member directly
    #[instrument(skip(self, caller, request), fields(user_id = %caller.user_id))]
    pub async fn add(
        &self,
        caller: &Caller,
        community_id: Uuid,
        request: AddMemberRequest,
    ) -> ServiceResult<JoinResponse> {
        let policy = PolicyService::new(self.ctx);
        let community = policy.community(community_id).await?;
        policy.require(&community, caller, Action::ManageMembers).await?;

        self.ctx
            .profile_repo()
            .find_by_id(request.user_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(request.user_id))?;

        let outcome = self
            .join_with_cascade(community.id, request.user_id, request.role)
            .await?;

        Ok(outcome.into())
    }

    /// Change a member's role; the creator always stays admin
    #[instrument(skip(self, caller, request), fields(user_id = %caller.user_id))]
    pub async fn update_role(
        &self,
        caller: &Caller,
        community_id: Uuid,
        member_id: Uuid,
        request: UpdateMemberRoleRequest,
    ) -> ServiceResult<()> {
        let policy = PolicyService::new(self.ctx);
        let community = policy.community(community_id).await?;
        policy.require(&community, caller, Action::ManageMembers).await?;

        if community.is_creator(member_id) {
            return Err(DomainError::CannotRemoveCreator.into());
        }

        self.ctx
            .membership_repo()
            .update_role(community_id, member_id, request.role)
            .await?;

        info!(community_id = %community_id, member_id = %member_id, role = request.role.as_str(), "Member role changed");
        Ok(())
    }

    /// Remove a member. Members may also remove themselves.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn remove(&self, caller: &Caller, community_id: Uuid, member_id: Uuid) -> ServiceResult<()> {
        let policy = PolicyService::new(self.ctx);
        let community = policy.community(community_id).await?;

        if community.is_creator(member_id) {
            return Err(DomainError::CannotRemoveCreator.into());
        }
        if caller.user_id != member_id {
            policy.require(&community, caller, Action::ManageMembers).await?;
        }

        self.ctx.membership_repo().delete(community_id, member_id).await?;

        info!(community_id = %community_id, member_id = %member_id, "Member removed");
        Ok(())
    }
}
