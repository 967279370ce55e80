//! Course, lesson and enrollment handlers

use axum::{extract::State, Json};
use campus_service::dto::{
    CompleteLessonRequest, CourseResponse, CreateCourseRequest, CreateLessonRequest,
    EnrollmentResponse, LessonProgressResponse, LessonResponse, PublishCourseRequest,
};
use campus_service::{CourseService, EnrollmentService, LessonService};

use crate::extractors::{
    ApiPath, AuthUser, CommunityIdPath, CourseIdPath, EnrollmentIdPath, ValidatedJson,
};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /api/communities/{community_id}/courses
pub async fn create_course(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CommunityIdPath>,
    ValidatedJson(request): ValidatedJson<CreateCourseRequest>,
) -> ApiResult<Created<Json<CourseResponse>>> {
    let course = CourseService::new(state.service_context())
        .create(&auth.caller, path.community_id, request)
        .await?;
    Ok(Created(Json(course)))
}

/// Publish or unpublish a course
///
/// PATCH /api/courses/{course_id}
pub async fn publish_course(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CourseIdPath>,
    ValidatedJson(request): ValidatedJson<PublishCourseRequest>,
) -> ApiResult<Json<CourseResponse>> {
    let course = CourseService::new(state.service_context())
        .set_published(&auth.caller, path.course_id, request.published)
        .await?;
    Ok(Json(course))
}

/// POST /api/courses/{course_id}/lessons
pub async fn add_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CourseIdPath>,
    ValidatedJson(request): ValidatedJson<CreateLessonRequest>,
) -> ApiResult<Created<Json<LessonResponse>>> {
    let lesson = CourseService::new(state.service_context())
        .add_lesson(&auth.caller, path.course_id, request)
        .await?;
    Ok(Created(Json(lesson)))
}

/// Enroll in a free course
///
/// POST /api/courses/{course_id}/enroll
pub async fn enroll(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CourseIdPath>,
) -> ApiResult<Json<EnrollmentResponse>> {
    let enrollment = EnrollmentService::new(state.service_context())
        .enroll_free(&auth.caller, path.course_id)
        .await?;
    Ok(Json(enrollment))
}

/// POST /api/enrollments/{enrollment_id}/cancel
pub async fn cancel_enrollment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<EnrollmentIdPath>,
) -> ApiResult<NoContent> {
    EnrollmentService::new(state.service_context())
        .cancel(&auth.caller, path.enrollment_id)
        .await?;
    Ok(NoContent)
}

/// Mark a lesson complete and report course progress
///
/// POST /api/lessons/complete
pub async fn complete_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CompleteLessonRequest>,
) -> ApiResult<Json<LessonProgressResponse>> {
    let progress = LessonService::new(state.service_context())
        .complete(&auth.caller, request.lesson_id)
        .await?;
    Ok(Json(progress))
}
