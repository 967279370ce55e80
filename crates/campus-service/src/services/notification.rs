//! Notification service
//!
//! Lists and acknowledges a user's notifications. Other services write
//! notifications through [`NotificationService::notify`], which never fails
//! the operation that triggered it.

use campus_core::{Caller, DomainError, Notification, NotificationKind};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::dto::{NotificationQuery, NotificationResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Most recent notifications for the caller
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn list(
        &self,
        caller: &Caller,
        query: &NotificationQuery,
    ) -> ServiceResult<Vec<NotificationResponse>> {
        let notifications = self
            .ctx
            .notification_repo()
            .find_by_user(caller.user_id, query.limit())
            .await?;

        Ok(notifications.iter().map(NotificationResponse::from).collect())
    }

    /// Mark one of the caller's notifications as read
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn mark_read(&self, caller: &Caller, notification_id: Uuid) -> ServiceResult<()> {
        let updated = self
            .ctx
            .notification_repo()
            .mark_read(notification_id, caller.user_id)
            .await?;

        if !updated {
            return Err(DomainError::NotificationNotFound(notification_id).into());
        }

        Ok(())
    }

    /// Write a notification; failures are logged and swallowed
    pub async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        link: Option<String>,
    ) {
        let mut notification = Notification::new(user_id, kind, title.into(), body.into());
        if let Some(link) = link {
            notification = notification.with_link(link);
        }

        if let Err(e) = self.ctx.notification_repo().create(&notification).await {
            warn!(
                user_id = %user_id,
                kind = kind.as_str(),
                error = %e,
                "Failed to write notification"
            );
        }
    }
}
