//! Notification handlers

use axum::{extract::State, Json};
use campus_service::dto::{NotificationQuery, NotificationResponse};
use campus_service::NotificationService;

use crate::extractors::{ApiPath, AuthUser, NotificationIdPath, ValidatedQuery};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Most recent notifications for the signed-in user
///
/// GET /api/notifications?limit=...
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<NotificationQuery>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let notifications = NotificationService::new(state.service_context())
        .list(&auth.caller, &query)
        .await?;
    Ok(Json(notifications))
}

/// POST /api/notifications/{notification_id}/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<NotificationIdPath>,
) -> ApiResult<NoContent> {
    NotificationService::new(state.service_context())
        .mark_read(&auth.caller, path.notification_id)
        .await?;
    Ok(NoContent)
}
