//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, JWT_SECRET, PAYMENT_SECRET_KEY,
//!   PAYMENT_WEBHOOK_HASH, AUTH_API_URL, AUTH_API_KEY
//!
//! Run with: cargo test -p integration-tests --test api_tests

use campus_core::PlatformRole;
use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, location, TestServer, TestUser,
};
use reqwest::StatusCode;

async fn community_owned_by(server: &TestServer, owner: &TestUser) -> CommunityResponse {
    let response = server
        .post_auth("/api/communities", owner, &CreateCommunityRequest::unique())
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn published_course(
    server: &TestServer,
    owner: &TestUser,
    community: &CommunityResponse,
    request: &CreateCourseRequest,
) -> CourseResponse {
    let response = server
        .post_auth(&format!("/api/communities/{}/courses", community.id), owner, request)
        .await
        .unwrap();
    let course: CourseResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .patch_auth(
            &format!("/api/courses/{}", course.id),
            owner,
            &PublishCourseRequest { published: true },
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Page Access Tests
// ============================================================================

#[tokio::test]
async fn test_dashboard_requires_session() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/dashboard/courses").await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response).as_deref(),
        Some("/login?next=%2Fdashboard%2Fcourses")
    );
}

#[tokio::test]
async fn test_student_denied_creator_area() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.seed_user(PlatformRole::Student).await.unwrap();

    let response = server.get_auth("/dashboard/creator", &student).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response).as_deref(),
        Some("/dashboard?error=access_denied")
    );
}

// ============================================================================
// Community Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_fetch_community() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let creator = server.seed_user(PlatformRole::Creator).await.unwrap();

    let community = community_owned_by(&server, &creator).await;
    assert_eq!(community.creator_id, creator.id);

    let response = server
        .get(&format!("/api/communities/slug/{}", community.slug))
        .await
        .unwrap();
    let fetched: CommunityResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.id, community.id);

    let response = server
        .get_auth(&format!("/api/communities/{}/members", community.id), &creator)
        .await
        .unwrap();
    let members: Vec<MemberResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].role, "admin");
}

#[tokio::test]
async fn test_student_cannot_create_community() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let student = server.seed_user(PlatformRole::Student).await.unwrap();

    let response = server
        .post_auth("/api/communities", &student, &CreateCommunityRequest::unique())
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let creator = server.seed_user(PlatformRole::Creator).await.unwrap();
    let community = community_owned_by(&server, &creator).await;

    let request = CreateCommunityRequest {
        slug: community.slug.clone(),
        name: "Another".to_string(),
        description: None,
    };
    let response = server
        .post_auth("/api/communities", &creator, &request)
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert!(!body.error.code.is_empty());
}

// ============================================================================
// Invitation Tests
// ============================================================================

#[tokio::test]
async fn test_invitation_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.seed_user(PlatformRole::Creator).await.unwrap();
    let invitee = server.seed_user(PlatformRole::Student).await.unwrap();
    let stranger = server.seed_user(PlatformRole::Student).await.unwrap();
    let community = community_owned_by(&server, &owner).await;

    let request = CreateInvitationRequest {
        email: Some(invitee.email.clone()),
        role: Some("moderator".to_string()),
    };
    let response = server
        .post_auth(
            &format!("/api/communities/{}/invitations", community.id),
            &owner,
            &request,
        )
        .await
        .unwrap();
    let invitation: InvitationCreatedResponse =
        assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(invitation.link.ends_with(&format!("/invite/{}", invitation.token)));

    // Anyone may preview
    let response = server
        .get(&format!("/invite/{}", invitation.token))
        .await
        .unwrap();
    let preview: InvitationPreviewResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(preview.status, "valid");
    assert_eq!(preview.community.unwrap().slug, community.slug);

    // Scoped to another email
    let response = server
        .post_empty_auth(&format!("/invite/{}", invitation.token), &stranger)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .post_empty_auth(&format!("/invite/{}", invitation.token), &invitee)
        .await
        .unwrap();
    let redeemed: RedeemResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(redeemed.success);
    assert!(redeemed.joined);
    assert_eq!(redeemed.community_slug, community.slug);

    // Email-scoped invitations are single use
    let response = server
        .get(&format!("/invite/{}", invitation.token))
        .await
        .unwrap();
    let preview: InvitationPreviewResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(preview.status, "invalid");

    let response = server
        .get_auth(&format!("/api/communities/{}/members", community.id), &owner)
        .await
        .unwrap();
    let members: Vec<MemberResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let member = members.iter().find(|m| m.user_id == invitee.id).unwrap();
    assert_eq!(member.role, "moderator");

    let response = server.get_auth("/api/notifications", &owner).await.unwrap();
    let notifications: Vec<NotificationResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(!notifications[0].read);

    let response = server
        .post_empty_auth(
            &format!("/api/notifications/{}/read", notifications[0].id),
            &owner,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

#[tokio::test]
async fn test_anonymous_redemption_redirects() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.post("/invite/some-token", &()).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/login?next=%2Finvite%2Fsome-token")
    );
}

// ============================================================================
// Course Tests
// ============================================================================

#[tokio::test]
async fn test_join_enrolls_in_free_courses_and_tracks_progress() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.seed_user(PlatformRole::Creator).await.unwrap();
    let student = server.seed_user(PlatformRole::Student).await.unwrap();
    let community = community_owned_by(&server, &owner).await;
    let course = published_course(&server, &owner, &community, &CreateCourseRequest::free()).await;
    assert!(course.published);

    let mut lessons = Vec::new();
    for position in 0..2 {
        let request = CreateLessonRequest {
            title: format!("Lesson {position}"),
            position,
        };
        let response = server
            .post_auth(&format!("/api/courses/{}/lessons", course.id), &owner, &request)
            .await
            .unwrap();
        let lesson: LessonResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
        lessons.push(lesson);
    }

    let response = server
        .post_empty_auth(&format!("/api/communities/{}/join", community.id), &student)
        .await
        .unwrap();
    let joined: JoinResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(joined.joined);
    assert_eq!(joined.auto_enrolled, 1);

    let complete = CompleteLessonRequest {
        lesson_id: lessons[0].id,
    };
    let response = server
        .post_auth("/api/lessons/complete", &student, &complete)
        .await
        .unwrap();
    let progress: LessonProgressResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(progress.completed_lessons, 1);
    assert_eq!(progress.total_lessons, 2);
}

#[tokio::test]
async fn test_lesson_completion_requires_enrollment() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.seed_user(PlatformRole::Creator).await.unwrap();
    let outsider = server.seed_user(PlatformRole::Student).await.unwrap();
    let community = community_owned_by(&server, &owner).await;
    let course = published_course(
        &server,
        &owner,
        &community,
        &CreateCourseRequest::priced(5000, "XOF"),
    )
    .await;

    let request = CreateLessonRequest {
        title: "Intro".to_string(),
        position: 0,
    };
    let response = server
        .post_auth(&format!("/api/courses/{}/lessons", course.id), &owner, &request)
        .await
        .unwrap();
    let lesson: LessonResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            "/api/lessons/complete",
            &outsider,
            &CompleteLessonRequest { lesson_id: lesson.id },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // Paid courses go through checkout, not free enrollment
    let response = server
        .post_empty_auth(&format!("/api/courses/{}/enroll", course.id), &outsider)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Payment Tests
// ============================================================================

#[tokio::test]
async fn test_webhook_rejects_wrong_hash() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post_webhook("not-the-secret", r#"{"event":"charge.completed","data":{}}"#)
        .await
        .unwrap();

    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_checkout_rejects_free_course() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.seed_user(PlatformRole::Creator).await.unwrap();
    let student = server.seed_user(PlatformRole::Student).await.unwrap();
    let community = community_owned_by(&server, &owner).await;
    let course = published_course(&server, &owner, &community, &CreateCourseRequest::free()).await;

    let response = server
        .post_auth(
            "/api/checkout",
            &student,
            &serde_json::json!({ "courseId": course.id }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}
