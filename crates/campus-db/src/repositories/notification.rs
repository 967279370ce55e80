//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campus_core::{Notification, NotificationRepository, RepoResult};

use crate::mappers::collect_rows;
use crate::models::NotificationModel;

use super::error::map_db_error;

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self, notification), fields(user_id = %notification.user_id, kind = %notification.kind.as_str()))]
    async fn create(&self, notification: &Notification) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, body, link, created_at, read_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.link)
        .bind(notification.created_at)
        .bind(notification.read_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Uuid, limit: i64) -> RepoResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationModel>(
            r#"
            SELECT id, user_id, kind, title, body, link, created_at, read_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        collect_rows(rows)
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read_at = COALESCE(read_at, NOW())
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
