//! Enrollment service
//!
//! Free enrollment and cancellation. Paid enrollments start in
//! [`super::checkout`] and are activated by [`super::webhook`].

use campus_core::{Action, Caller, DomainError, Enrollment, MembershipRole, ResourceContext};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::EnrollmentResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::membership::MembershipService;
use super::policy::PolicyService;

/// Enrollment service
pub struct EnrollmentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EnrollmentService<'a> {
    /// Create a new EnrollmentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Enroll the caller in a free, published course
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn enroll_free(&self, caller: &Caller, course_id: Uuid) -> ServiceResult<EnrollmentResponse> {
        let course = self
            .ctx
            .course_repo()
            .find_by_id(course_id)
            .await?
            .filter(|c| c.published)
            .ok_or(DomainError::CourseNotFound(course_id))?;

        if !course.is_auto_enrollable() {
            return Err(DomainError::CourseNotFree.into());
        }

        let enrollment = Enrollment::free(caller.user_id, course.id, course.currency.clone());
        let enrollment = if self.ctx.enrollment_repo().create(&enrollment).await? {
            info!(enrollment_id = %enrollment.id, course_id = %course.id, "Free enrollment created");
            enrollment
        } else {
            self.ctx
                .enrollment_repo()
                .find_current(caller.user_id, course.id)
                .await?
                .ok_or_else(|| ServiceError::internal("enrollment vanished after conflicting insert"))?
        };

        if let Some(community_id) = course.community_id {
            if let Err(e) = MembershipService::new(self.ctx)
                .join_with_cascade(community_id, caller.user_id, MembershipRole::Member)
                .await
            {
                warn!(community_id = %community_id, error = %e, "Membership cascade failed");
            }
        }

        Ok(EnrollmentResponse::from(&enrollment))
    }

    /// Cancel an enrollment
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn cancel(&self, caller: &Caller, enrollment_id: Uuid) -> ServiceResult<()> {
        let enrollment = self
            .ctx
            .enrollment_repo()
            .find_by_id(enrollment_id)
            .await?
            .ok_or_else(|| DomainError::EnrollmentNotFound(enrollment_id.to_string()))?;

        let course = self
            .ctx
            .course_repo()
            .find_by_id(enrollment.course_id)
            .await?
            .ok_or(DomainError::CourseNotFound(enrollment.course_id))?;

        let policy = PolicyService::new(self.ctx);
        let resource = match course.community_id {
            Some(community_id) => {
                let community = policy.community(community_id).await?;
                policy.context_for(&community, caller).await?
            }
            // Standalone courses answer to their author
            None => ResourceContext {
                owner_id: course.created_by,
                membership: None,
                platform_role: policy.platform_role(caller).await?,
            },
        };
        PolicyService::check(caller, &resource, Action::CancelEnrollment)?;

        self.ctx.enrollment_repo().cancel(enrollment.id).await?;

        info!(enrollment_id = %enrollment.id, course_id = %course.id, "Enrollment cancelled");
        Ok(())
    }
}
