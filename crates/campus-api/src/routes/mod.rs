//! Route definitions
//!
//! JSON endpoints live under `/api`; the sign-in callback and the public
//! invitation page sit at the site root.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::{auth, checkout, communities, courses, health, invitations, notifications};
use crate::state::AppState;

/// Create the main router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(site_routes())
        .nest("/api", api_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Browser-facing routes outside `/api`
fn site_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/callback", get(auth::callback))
        .route(
            "/invite/:token",
            get(invitations::preview_invitation).post(invitations::redeem_invitation),
        )
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(community_routes())
        .merge(course_routes())
        .merge(payment_routes())
        .merge(notification_routes())
        .route(
            "/invitations/:invitation_id",
            delete(invitations::revoke_invitation),
        )
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
}

fn community_routes() -> Router<AppState> {
    Router::new()
        .route("/communities", post(communities::create_community))
        .route("/communities/slug/:slug", get(communities::get_community_by_slug))
        .route("/communities/:community_id", delete(communities::delete_community))
        .route("/communities/:community_id/join", post(communities::join_community))
        .route(
            "/communities/:community_id/spaces",
            get(communities::list_spaces).post(communities::create_space),
        )
        .route(
            "/communities/:community_id/members",
            get(communities::list_members).post(communities::add_member),
        )
        .route(
            "/communities/:community_id/members/:user_id",
            patch(communities::update_member_role).delete(communities::remove_member),
        )
        .route(
            "/communities/:community_id/invitations",
            get(invitations::list_invitations).post(invitations::create_invitation),
        )
        .route("/communities/:community_id/courses", post(courses::create_course))
}

fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/courses/:course_id", patch(courses::publish_course))
        .route("/courses/:course_id/lessons", post(courses::add_lesson))
        .route("/courses/:course_id/enroll", post(courses::enroll))
        .route("/enrollments/:enrollment_id/cancel", post(courses::cancel_enrollment))
        .route("/lessons/complete", post(courses::complete_lesson))
}

fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout::checkout))
        .route("/webhook/payment", post(checkout::payment_webhook))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/:notification_id/read",
            post(notifications::mark_notification_read),
        )
}
