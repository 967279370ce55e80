//! Community-scoped authorization policy
//!
//! Every ownership or role check in the service layer goes through
//! [`authorize`]. Callers load a [`ResourceContext`] and name the [`Action`];
//! the decision is a pure function of the two.

use uuid::Uuid;

use crate::value_objects::{Caller, MembershipRole, PlatformRole};

/// Actions that are gated on a community
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    IssueInvitation,
    ManageInvitations,
    ManageMembers,
    ManageCourses,
    ManageSpaces,
    ViewSpaces,
    CancelEnrollment,
    DeleteCommunity,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IssueInvitation => "ISSUE_INVITATION",
            Self::ManageInvitations => "MANAGE_INVITATIONS",
            Self::ManageMembers => "MANAGE_MEMBERS",
            Self::ManageCourses => "MANAGE_COURSES",
            Self::ManageSpaces => "MANAGE_SPACES",
            Self::ViewSpaces => "VIEW_SPACES",
            Self::CancelEnrollment => "CANCEL_ENROLLMENT",
            Self::DeleteCommunity => "DELETE_COMMUNITY",
        }
    }
}

/// Everything the policy needs to know about the caller's relation to a community
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceContext {
    pub owner_id: Uuid,
    pub membership: Option<MembershipRole>,
    pub platform_role: PlatformRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Self::Allow
        } else {
            Self::Deny
        }
    }
}

/// Decide whether `caller` may perform `action` on the community described by `ctx`
pub fn authorize(caller: &Caller, ctx: &ResourceContext, action: Action) -> Decision {
    let is_owner = caller.user_id == ctx.owner_id;
    let is_admin = ctx.membership.is_some_and(MembershipRole::is_admin);
    let is_platform_admin = ctx.platform_role == PlatformRole::Admin;

    let allowed = match action {
        Action::IssueInvitation
        | Action::ManageInvitations
        | Action::ManageMembers
        | Action::ManageCourses => is_owner || is_admin,
        Action::ManageSpaces => is_owner || ctx.membership.is_some_and(MembershipRole::can_moderate),
        Action::ViewSpaces => is_owner || ctx.membership.is_some() || is_platform_admin,
        Action::CancelEnrollment => is_owner || is_admin || is_platform_admin,
        Action::DeleteCommunity => is_owner,
    };

    Decision::from(allowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(owner_id: Uuid, membership: Option<MembershipRole>) -> ResourceContext {
        ResourceContext {
            owner_id,
            membership,
            platform_role: PlatformRole::Student,
        }
    }

    #[test]
    fn test_owner_may_issue_invitations() {
        let owner = Caller::new(Uuid::new_v4(), None);
        let decision = authorize(&owner, &ctx(owner.user_id, None), Action::IssueInvitation);
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_admin_member_may_issue_invitations() {
        let caller = Caller::new(Uuid::new_v4(), None);
        let context = ctx(Uuid::new_v4(), Some(MembershipRole::Admin));
        assert!(authorize(&caller, &context, Action::IssueInvitation).is_allowed());
    }

    #[test]
    fn test_moderator_and_member_may_not_issue_invitations() {
        let caller = Caller::new(Uuid::new_v4(), None);
        for role in [Some(MembershipRole::Moderator), Some(MembershipRole::Member), None] {
            let context = ctx(Uuid::new_v4(), role);
            assert_eq!(authorize(&caller, &context, Action::IssueInvitation), Decision::Deny);
        }
    }

    #[test]
    fn test_moderator_may_manage_spaces() {
        let caller = Caller::new(Uuid::new_v4(), None);
        let context = ctx(Uuid::new_v4(), Some(MembershipRole::Moderator));
        assert!(authorize(&caller, &context, Action::ManageSpaces).is_allowed());
        assert!(!authorize(&caller, &context, Action::ManageMembers).is_allowed());
    }

    #[test]
    fn test_only_owner_may_delete_community() {
        let caller = Caller::new(Uuid::new_v4(), None);
        let mut context = ctx(Uuid::new_v4(), Some(MembershipRole::Admin));
        context.platform_role = PlatformRole::Admin;
        assert_eq!(authorize(&caller, &context, Action::DeleteCommunity), Decision::Deny);

        let owner_ctx = ctx(caller.user_id, None);
        assert!(authorize(&caller, &owner_ctx, Action::DeleteCommunity).is_allowed());
    }

    #[test]
    fn test_platform_admin_may_cancel_enrollments() {
        let caller = Caller::new(Uuid::new_v4(), None);
        let mut context = ctx(Uuid::new_v4(), None);
        assert!(!authorize(&caller, &context, Action::CancelEnrollment).is_allowed());

        context.platform_role = PlatformRole::Admin;
        assert!(authorize(&caller, &context, Action::CancelEnrollment).is_allowed());
    }

    #[test]
    fn test_members_may_view_spaces() {
        let caller = Caller::new(Uuid::new_v4(), None);
        assert!(authorize(&caller, &ctx(Uuid::new_v4(), Some(MembershipRole::Member)), Action::ViewSpaces).is_allowed());
        assert!(!authorize(&caller, &ctx(Uuid::new_v4(), None), Action::ViewSpaces).is_allowed());
    }
}
