//! Lesson service

use campus_core::{Caller, DomainError};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::dto::LessonProgressResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Lesson service
pub struct LessonService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LessonService<'a> {
    /// Create a new LessonService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record completion of a lesson and report course progress.
    ///
    /// Requires an active enrollment in the lesson's course.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn complete(&self, caller: &Caller, lesson_id: Uuid) -> ServiceResult<LessonProgressResponse> {
        let lesson = self
            .ctx
            .lesson_repo()
            .find_by_id(lesson_id)
            .await?
            .ok_or(DomainError::LessonNotFound(lesson_id))?;

        let enrolled = self
            .ctx
            .enrollment_repo()
            .find_current(caller.user_id, lesson.course_id)
            .await?
            .is_some_and(|e| e.is_active());
        if !enrolled {
            return Err(DomainError::EnrollmentRequired.into());
        }

        self.ctx
            .lesson_repo()
            .record_completion(caller.user_id, lesson.id)
            .await?;

        let progress = self
            .ctx
            .lesson_repo()
            .progress(caller.user_id, lesson.course_id)
            .await?;

        debug!(
            course_id = %lesson.course_id,
            completed = progress.completed,
            total = progress.total,
            "Lesson completed"
        );

        Ok(progress.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;
    use campus_core::{Enrollment, PlatformRole};

    #[tokio::test]
    async fn test_completion_requires_active_enrollment() {
        let t = TestContext::new();
        let owner = t.user("owner@example.com", PlatformRole::Creator);
        let community = t.community(&owner, "lessons").await;
        let course = t.course(&community, 5000, "XOF", true);
        let lesson = t.lesson(&course, 0).await;
        let student = t.student("student@example.com");
        t.db.put_enrollment(Enrollment::pending(student.user_id, course.id, 5000, "XOF".into()));

        let err = LessonService::new(&t.ctx)
            .complete(&student, lesson.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_completion_reports_progress_once_per_lesson() {
        let t = TestContext::new();
        let owner = t.user("owner@example.com", PlatformRole::Creator);
        let community = t.community(&owner, "lessons").await;
        let course = t.course(&community, 0, "XOF", true);
        let first = t.lesson(&course, 0).await;
        t.lesson(&course, 1).await;
        let student = t.student("student@example.com");
        t.db.put_enrollment(Enrollment::free(student.user_id, course.id, "XOF".into()));
        let service = LessonService::new(&t.ctx);

        service.complete(&student, first.id).await.unwrap();
        let progress = service.complete(&student, first.id).await.unwrap();

        assert_eq!(progress.completed_lessons, 1);
        assert_eq!(progress.total_lessons, 2);
    }

    #[tokio::test]
    async fn test_unknown_lesson() {
        let t = TestContext::new();
        let student = t.student("student@example.com");
        let err = LessonService::new(&t.ctx)
            .complete(&student, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
