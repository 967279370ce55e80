//! Course service
//!
//! Authoring inside a community: create, publish, add lessons.

use campus_core::{money, Action, Caller, Course, DomainError, Lesson};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{CourseResponse, CreateCourseRequest, CreateLessonRequest, LessonResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::policy::PolicyService;

/// Course service
pub struct CourseService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CourseService<'a> {
    /// Create a new CourseService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a community course and require `ManageCourses` on its community
    async fn managed_course(&self, caller: &Caller, course_id: Uuid) -> ServiceResult<Course> {
        let course = self
            .ctx
            .course_repo()
            .find_by_id(course_id)
            .await?
            .ok_or(DomainError::CourseNotFound(course_id))?;

        let policy = PolicyService::new(self.ctx);
        match course.community_id {
            Some(community_id) => {
                let community = policy.community(community_id).await?;
                policy.require(&community, caller, Action::ManageCourses).await?;
            }
            None if course.created_by == caller.user_id => {}
            None => return Err(ServiceError::permission_denied(Action::ManageCourses.as_str())),
        }

        Ok(course)
    }

    /// Create an unpublished course in a community
    #[instrument(skip(self, caller, request), fields(user_id = %caller.user_id))]
    pub async fn create(
        &self,
        caller: &Caller,
        community_id: Uuid,
        request: CreateCourseRequest,
    ) -> ServiceResult<CourseResponse> {
        let policy = PolicyService::new(self.ctx);
        let community = policy.community(community_id).await?;
        policy.require(&community, caller, Action::ManageCourses).await?;

        let currency = money::normalize_currency(&request.currency)?;
        let mut course = Course::new(request.title.trim().to_string(), request.price, currency, caller.user_id)
            .in_community(community.id);
        course.description = request.description;

        self.ctx.course_repo().create(&course).await?;

        info!(course_id = %course.id, community_id = %community.id, price = course.price, "Course created");
        Ok(CourseResponse::from(&course))
    }

    /// Publish or unpublish a course
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn set_published(
        &self,
        caller: &Caller,
        course_id: Uuid,
        published: bool,
    ) -> ServiceResult<CourseResponse> {
        let mut course = self.managed_course(caller, course_id).await?;

        self.ctx.course_repo().set_published(course.id, published).await?;
        course.published = published;

        info!(course_id = %course.id, published, "Course publication changed");
        Ok(CourseResponse::from(&course))
    }

    /// Add a lesson to a course
    #[instrument(skip(self, caller, request), fields(user_id = %caller.user_id))]
    pub async fn add_lesson(
        &self,
        caller: &Caller,
        course_id: Uuid,
        request: CreateLessonRequest,
    ) -> ServiceResult<LessonResponse> {
        let course = self.managed_course(caller, course_id).await?;

        let lesson = Lesson::new(course.id, request.title.trim().to_string(), request.position);
        self.ctx.lesson_repo().create(&lesson).await?;

        Ok(LessonResponse::from(&lesson))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;
    use campus_core::{MembershipRole, PlatformRole};

    fn request(price: i64, currency: &str) -> CreateCourseRequest {
        CreateCourseRequest {
            title: " Intro to Rust ".to_string(),
            description: None,
            price,
            currency: currency.to_string(),
        }
    }

    #[tokio::test]
    async fn test_admin_authors_a_course() {
        let t = TestContext::new();
        let owner = t.user("owner@example.com", PlatformRole::Creator);
        let community = t.community(&owner, "authors").await;
        let service = CourseService::new(&t.ctx);

        let course = service.create(&owner, community.id, request(5000, "xof")).await.unwrap();
        assert_eq!(course.title, "Intro to Rust");
        assert_eq!(course.currency, "XOF");
        assert!(!course.published);

        let published = service.set_published(&owner, course.id, true).await.unwrap();
        assert!(published.published);

        let lesson = service
            .add_lesson(
                &owner,
                course.id,
                CreateLessonRequest {
                    title: "Ownership".into(),
                    position: 0,
                },
            )
            .await
            .unwrap();
        assert_eq!(lesson.course_id, course.id);
    }

    #[tokio::test]
    async fn test_members_cannot_author() {
        let t = TestContext::new();
        let owner = t.user("owner@example.com", PlatformRole::Creator);
        let community = t.community(&owner, "authors").await;
        let member = t.student("member@example.com");
        t.add_member(&community, &member, MembershipRole::Moderator).await;
        let service = CourseService::new(&t.ctx);

        let err = service.create(&member, community.id, request(0, "XOF")).await.unwrap_err();
        assert_eq!(err.status_code(), 403);

        let course = t.course(&community, 0, "XOF", false);
        let err = service.set_published(&member, course.id, true).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_bad_currency() {
        let t = TestContext::new();
        let owner = t.user("owner@example.com", PlatformRole::Creator);
        let community = t.community(&owner, "authors").await;

        let err = CourseService::new(&t.ctx)
            .create(&owner, community.id, request(100, "U$D"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
