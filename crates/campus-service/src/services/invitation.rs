//! Invitation service
//!
//! Issues, lists, revokes, previews and redeems community invitations.

use campus_core::{Action, Caller, Consumption, DomainError, Invitation, NotificationKind};
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{
    CommunitySummary, CreateInvitationRequest, InvitationCreatedResponse,
    InvitationPreviewResponse, InvitationResponse, InvitationStatus, RedeemResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::membership::MembershipService;
use super::notification::NotificationService;
use super::policy::PolicyService;

/// Result of a successful redemption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemOutcome {
    pub community_id: Uuid,
    pub community_slug: String,
    /// This redemption created the membership
    pub joined: bool,
    pub auto_enrolled: u64,
}

impl From<RedeemOutcome> for RedeemResponse {
    fn from(outcome: RedeemOutcome) -> Self {
        Self {
            success: true,
            community_slug: outcome.community_slug,
            joined: outcome.joined,
            auto_enrolled: outcome.auto_enrolled,
        }
    }
}

/// Invitation service
pub struct InvitationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InvitationService<'a> {
    /// Create a new InvitationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Issue a new invitation for a community
    #[instrument(skip(self, caller, request), fields(user_id = %caller.user_id))]
    pub async fn issue(
        &self,
        caller: &Caller,
        community_id: Uuid,
        request: CreateInvitationRequest,
    ) -> ServiceResult<InvitationCreatedResponse> {
        let policy = PolicyService::new(self.ctx);
        let community = policy.community(community_id).await?;
        policy.require(&community, caller, Action::IssueInvitation).await?;

        let email = request
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        let role = request.role.unwrap_or_default();

        let invitation = Invitation::new(community.id, email, role, caller.user_id);
        self.ctx.invitation_repo().create(&invitation).await?;

        info!(
            invitation_id = %invitation.id,
            community_id = %community.id,
            role = role.as_str(),
            email_scoped = invitation.is_email_scoped(),
            "Invitation issued"
        );

        Ok(InvitationCreatedResponse::new(&invitation, &self.ctx.site().url))
    }

    /// List invitations of a community
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn list(
        &self,
        caller: &Caller,
        community_id: Uuid,
    ) -> ServiceResult<Vec<InvitationResponse>> {
        let policy = PolicyService::new(self.ctx);
        let community = policy.community(community_id).await?;
        policy.require(&community, caller, Action::ManageInvitations).await?;

        let invitations = self.ctx.invitation_repo().find_by_community(community.id).await?;
        let site_url = &self.ctx.site().url;

        Ok(invitations
            .iter()
            .map(|invitation| InvitationResponse::new(invitation, site_url))
            .collect())
    }

    /// Revoke an invitation
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn revoke(&self, caller: &Caller, invitation_id: Uuid) -> ServiceResult<()> {
        let invitation = self
            .ctx
            .invitation_repo()
            .find_by_id(invitation_id)
            .await?
            .ok_or(DomainError::InvitationNotFound)?;

        let policy = PolicyService::new(self.ctx);
        let community = policy.community(invitation.community_id).await?;
        policy.require(&community, caller, Action::ManageInvitations).await?;

        self.ctx.invitation_repo().delete(invitation.id).await?;

        info!(invitation_id = %invitation.id, community_id = %community.id, "Invitation revoked");
        Ok(())
    }

    /// Public view of a token: valid, expired or invalid
    #[instrument(skip(self, token))]
    pub async fn preview(&self, token: &str) -> ServiceResult<InvitationPreviewResponse> {
        let Some(invitation) = self.ctx.invitation_repo().find_by_token(token).await? else {
            return Ok(InvitationPreviewResponse::invalid());
        };

        let community = self
            .ctx
            .community_repo()
            .find_by_id(invitation.community_id)
            .await?;

        let Some(community) = community else {
            return Ok(InvitationPreviewResponse::invalid());
        };

        let status = if invitation.is_expired() {
            InvitationStatus::Expired
        } else {
            InvitationStatus::Valid
        };

        Ok(InvitationPreviewResponse {
            status,
            community: Some(CommunitySummary::from(community)),
        })
    }

    /// Redeem an invitation.
    ///
    /// Gates run in order: session, token lookup, expiry, email scope. Only
    /// then is the membership inserted (idempotently), the free-course
    /// cascade run for a fresh join, and the invitation consumed.
    #[instrument(skip(self, caller, token), fields(user_id = ?caller.map(|c| c.user_id)))]
    pub async fn redeem(&self, caller: Option<&Caller>, token: &str) -> ServiceResult<RedeemOutcome> {
        let caller = caller.ok_or_else(ServiceError::unauthorized)?;

        let invitation = self
            .ctx
            .invitation_repo()
            .find_by_token(token)
            .await?
            .ok_or(DomainError::InvitationNotFound)?;

        if invitation.is_expired_at(Utc::now()) {
            return Err(DomainError::InvitationExpired.into());
        }

        if !invitation.admits(caller.email()) {
            warn!(invitation_id = %invitation.id, user_id = %caller.user_id, "Invitation email does not match caller");
            return Err(DomainError::InvitationEmailMismatch.into());
        }

        let community = PolicyService::new(self.ctx)
            .community(invitation.community_id)
            .await?;

        let outcome = MembershipService::new(self.ctx)
            .join_with_cascade(community.id, caller.user_id, invitation.role)
            .await?;

        self.consume(&invitation).await;

        if outcome.created {
            let notifications = NotificationService::new(self.ctx);
            notifications
                .notify(
                    caller.user_id,
                    NotificationKind::CommunityJoined,
                    format!("Welcome to {}", community.name),
                    format!("You joined as {}.", invitation.role),
                    Some(format!("/c/{}", community.slug)),
                )
                .await;
            if invitation.invited_by != caller.user_id {
                notifications
                    .notify(
                        invitation.invited_by,
                        NotificationKind::InvitationAccepted,
                        "Invitation accepted",
                        format!("A new member joined {}.", community.name),
                        None,
                    )
                    .await;
            }
        }

        info!(
            invitation_id = %invitation.id,
            community_id = %community.id,
            joined = outcome.created,
            auto_enrolled = outcome.auto_enrolled,
            "Invitation redeemed"
        );

        Ok(RedeemOutcome {
            community_id: community.id,
            community_slug: community.slug,
            joined: outcome.created,
            auto_enrolled: outcome.auto_enrolled,
        })
    }

    /// Email-scoped invitations are deleted; open links get `accepted_at`
    async fn consume(&self, invitation: &Invitation) {
        let result = match invitation.consumption() {
            Consumption::Delete => self.ctx.invitation_repo().delete(invitation.id).await,
            Consumption::MarkAccepted => {
                self.ctx
                    .invitation_repo()
                    .mark_accepted(invitation.id, Utc::now())
                    .await
            }
        };

        if let Err(e) = result {
            warn!(invitation_id = %invitation.id, error = %e, "Failed to consume invitation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;
    use campus_core::{Community, EnrollmentStatus, MembershipRole, PlatformRole};
    use chrono::Duration;

    async fn setup() -> (TestContext, Caller, Community) {
        let t = TestContext::new();
        let owner = t.user("owner@example.com", PlatformRole::Creator);
        let community = t.community(&owner, "rust-circle").await;
        (t, owner, community)
    }

    fn invite(email: Option<&str>, role: MembershipRole) -> CreateInvitationRequest {
        CreateInvitationRequest {
            email: email.map(str::to_string),
            role: Some(role),
        }
    }

    #[tokio::test]
    async fn test_moderator_invitation_is_redeemed_and_deleted() {
        let (t, owner, community) = setup().await;
        let service = InvitationService::new(&t.ctx);

        let created = service
            .issue(&owner, community.id, invite(Some("bob@example.com"), MembershipRole::Moderator))
            .await
            .unwrap();
        assert_eq!(created.link, format!("http://localhost:3000/invite/{}", created.token));

        let bob = t.student("bob@example.com");
        let outcome = service.redeem(Some(&bob), &created.token).await.unwrap();
        assert!(outcome.joined);
        assert_eq!(outcome.community_slug, "rust-circle");

        let members = t.db.memberships_of(community.id);
        let bob_membership = members.iter().find(|m| m.user_id == bob.user_id).unwrap();
        assert_eq!(bob_membership.role, MembershipRole::Moderator);

        // Email-scoped invitations are single use
        assert!(t.db.invitation(created.id).is_none());
        assert_eq!(t.db.notifications_of(owner.user_id).len(), 1);
    }

    #[tokio::test]
    async fn test_expired_invitation_creates_no_membership() {
        let (t, owner, community) = setup().await;
        let mut invitation = Invitation::new(community.id, None, MembershipRole::Member, owner.user_id);
        invitation.expires_at = Utc::now() - Duration::minutes(1);
        t.db.put_invitation(invitation.clone());

        let carol = t.student("carol@example.com");
        let err = InvitationService::new(&t.ctx)
            .redeem(Some(&carol), &invitation.token)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Domain(DomainError::InvitationExpired)));
        assert_eq!(err.status_code(), 410);
        assert!(t.db.memberships_of(community.id).iter().all(|m| m.user_id != carol.user_id));
    }

    #[tokio::test]
    async fn test_email_mismatch_is_forbidden() {
        let (t, owner, community) = setup().await;
        let service = InvitationService::new(&t.ctx);
        let created = service
            .issue(&owner, community.id, invite(Some("bob@example.com"), MembershipRole::Member))
            .await
            .unwrap();

        let mallory = t.student("mallory@example.com");
        let err = service.redeem(Some(&mallory), &created.token).await.unwrap_err();

        assert_eq!(err.status_code(), 403);
        assert!(t.db.invitation(created.id).is_some());
        assert_eq!(t.db.memberships_of(community.id).len(), 1);
    }

    #[tokio::test]
    async fn test_email_scope_is_case_sensitive() {
        let (t, owner, community) = setup().await;
        let service = InvitationService::new(&t.ctx);
        let created = service
            .issue(&owner, community.id, invite(Some("Bob@Example.com"), MembershipRole::Member))
            .await
            .unwrap();

        let bob = t.student("bob@example.com");
        let err = service.redeem(Some(&bob), &created.token).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvitationEmailMismatch)));
    }

    #[tokio::test]
    async fn test_open_moderator_invitation_enrolls_in_free_course() {
        let (t, owner, community) = setup().await;
        let free = t.course(&community, 0, "XOF", true);
        let service = InvitationService::new(&t.ctx);
        let created = service
            .issue(&owner, community.id, invite(None, MembershipRole::Moderator))
            .await
            .unwrap();

        let alice = t.student("alice@example.com");
        let outcome = service.redeem(Some(&alice), &created.token).await.unwrap();
        assert!(outcome.joined);
        assert_eq!(outcome.auto_enrolled, 1);

        let members = t.db.memberships_of(community.id);
        let membership = members.iter().find(|m| m.user_id == alice.user_id).unwrap();
        assert_eq!(membership.role, MembershipRole::Moderator);

        let enrollments = t.db.enrollments_of(alice.user_id);
        assert_eq!(enrollments.len(), 1);
        assert_eq!(enrollments[0].course_id, free.id);
        assert_eq!(enrollments[0].status, EnrollmentStatus::Active);
        assert_eq!(enrollments[0].amount, 0);
    }

    #[tokio::test]
    async fn test_open_link_redeemed_twice_keeps_one_membership() {
        let (t, owner, community) = setup().await;
        let service = InvitationService::new(&t.ctx);
        let created = service
            .issue(&owner, community.id, invite(None, MembershipRole::Member))
            .await
            .unwrap();

        let dave = t.student("dave@example.com");
        let first = service.redeem(Some(&dave), &created.token).await.unwrap();
        let second = service.redeem(Some(&dave), &created.token).await.unwrap();

        assert!(first.joined);
        assert!(!second.joined);
        let daves = t
            .db
            .memberships_of(community.id)
            .into_iter()
            .filter(|m| m.user_id == dave.user_id)
            .count();
        assert_eq!(daves, 1);
        assert!(t.db.invitation(created.id).unwrap().accepted_at.is_some());
        // Welcome notification only for the first join
        assert_eq!(t.db.notifications_of(dave.user_id).len(), 1);
    }

    #[tokio::test]
    async fn test_join_enrolls_in_every_published_free_course() {
        let (t, owner, community) = setup().await;
        for _ in 0..3 {
            t.course(&community, 0, "XOF", true);
        }
        t.course(&community, 0, "XOF", false);
        t.course(&community, 5000, "XOF", true);

        let created = InvitationService::new(&t.ctx)
            .issue(&owner, community.id, invite(None, MembershipRole::Member))
            .await
            .unwrap();

        let erin = t.student("erin@example.com");
        let outcome = InvitationService::new(&t.ctx)
            .redeem(Some(&erin), &created.token)
            .await
            .unwrap();

        assert_eq!(outcome.auto_enrolled, 3);
        let enrollments = t.db.enrollments_of(erin.user_id);
        assert_eq!(enrollments.len(), 3);
        assert!(enrollments.iter().all(|e| e.is_active() && e.amount == 0));
    }

    #[tokio::test]
    async fn test_redeem_requires_a_session() {
        let (t, owner, community) = setup().await;
        let created = InvitationService::new(&t.ctx)
            .issue(&owner, community.id, invite(None, MembershipRole::Member))
            .await
            .unwrap();

        let err = InvitationService::new(&t.ctx)
            .redeem(None, &created.token)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let (t, _, _) = setup().await;
        let frank = t.student("frank@example.com");
        let err = InvitationService::new(&t.ctx)
            .redeem(Some(&frank), "does-not-exist")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvitationNotFound)));
    }

    #[tokio::test]
    async fn test_moderator_may_not_issue() {
        let (t, _, community) = setup().await;
        let moderator = t.student("mod@example.com");
        t.add_member(&community, &moderator, MembershipRole::Moderator).await;

        let err = InvitationService::new(&t.ctx)
            .issue(&moderator, community.id, invite(None, MembershipRole::Member))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_preview_reports_status() {
        let (t, owner, community) = setup().await;
        let service = InvitationService::new(&t.ctx);

        let invalid = service.preview("nope").await.unwrap();
        assert_eq!(invalid.status, InvitationStatus::Invalid);
        assert!(invalid.community.is_none());

        let mut invitation = Invitation::new(community.id, None, MembershipRole::Member, owner.user_id);
        t.db.put_invitation(invitation.clone());
        let valid = service.preview(&invitation.token).await.unwrap();
        assert_eq!(valid.status, InvitationStatus::Valid);
        assert_eq!(valid.community.unwrap().slug, "rust-circle");

        invitation.expires_at = Utc::now() - Duration::seconds(1);
        t.db.put_invitation(invitation.clone());
        let expired = service.preview(&invitation.token).await.unwrap();
        assert_eq!(expired.status, InvitationStatus::Expired);
    }

    #[tokio::test]
    async fn test_revoke_deletes() {
        let (t, owner, community) = setup().await;
        let service = InvitationService::new(&t.ctx);
        let created = service
            .issue(&owner, community.id, invite(None, MembershipRole::Member))
            .await
            .unwrap();

        assert_eq!(service.list(&owner, community.id).await.unwrap().len(), 1);
        service.revoke(&owner, created.id).await.unwrap();
        assert!(service.list(&owner, community.id).await.unwrap().is_empty());
    }
}
