//! PostgreSQL implementation of InvitationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use campus_core::{DomainError, Invitation, InvitationRepository, RepoResult};

use crate::mappers::collect_rows;
use crate::models::InvitationModel;

use super::error::{map_db_error, map_unique_violation};

const INVITATION_COLUMNS: &str =
    "id, community_id, email, token, role, invited_by, created_at, expires_at, accepted_at";

/// PostgreSQL implementation of InvitationRepository
#[derive(Clone)]
pub struct PgInvitationRepository {
    pool: PgPool,
}

impl PgInvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Token lookup through the `resolve_invitation` security-definer function
    async fn resolve_privileged(&self, token: &str) -> Result<Option<InvitationModel>, sqlx::Error> {
        sqlx::query_as::<_, InvitationModel>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM resolve_invitation($1)"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    async fn resolve_direct(&self, token: &str) -> RepoResult<Option<InvitationModel>> {
        sqlx::query_as::<_, InvitationModel>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl InvitationRepository for PgInvitationRepository {
    #[instrument(skip(self, invitation), fields(community_id = %invitation.community_id))]
    async fn create(&self, invitation: &Invitation) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO invitations (id, community_id, email, token, role, invited_by,
                                     created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(invitation.id)
        .bind(invitation.community_id)
        .bind(&invitation.email)
        .bind(&invitation.token)
        .bind(invitation.role.as_str())
        .bind(invitation.invited_by)
        .bind(invitation.created_at)
        .bind(invitation.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::InvitationTokenExists))?;

        Ok(())
    }

    #[instrument(skip_all)]
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Invitation>> {
        let row = match self.resolve_privileged(token).await {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, "Privileged invitation lookup failed, falling back to direct read");
                self.resolve_direct(token).await?
            }
        };

        row.map(Invitation::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Invitation>> {
        let row = sqlx::query_as::<_, InvitationModel>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Invitation::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_community(&self, community_id: Uuid) -> RepoResult<Vec<Invitation>> {
        let rows = sqlx::query_as::<_, InvitationModel>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations
             WHERE community_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        collect_rows(rows)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InvitationNotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_accepted(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<()> {
        sqlx::query("UPDATE invitations SET accepted_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
