//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campus_core::{DomainError, Membership, MembershipRepository, MembershipRole, RepoResult};

use crate::mappers::collect_rows;
use crate::models::MembershipModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find(&self, community_id: Uuid, user_id: Uuid) -> RepoResult<Option<Membership>> {
        let row = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT community_id, user_id, role, joined_at
            FROM memberships
            WHERE community_id = $1 AND user_id = $2
            "#,
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Membership::try_from).transpose()
    }

    #[instrument(skip(self, membership), fields(community_id = %membership.community_id, user_id = %membership.user_id))]
    async fn insert_if_absent(&self, membership: &Membership) -> RepoResult<bool> {
        // The primary key settles concurrent joins; the loser inserts nothing.
        let result = sqlx::query(
            r#"
            INSERT INTO memberships (community_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (community_id, user_id) DO NOTHING
            "#,
        )
        .bind(membership.community_id)
        .bind(membership.user_id)
        .bind(membership.role.as_str())
        .bind(membership.joined_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn find_by_community(&self, community_id: Uuid) -> RepoResult<Vec<Membership>> {
        let rows = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT community_id, user_id, role, joined_at
            FROM memberships
            WHERE community_id = $1
            ORDER BY joined_at
            "#,
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        collect_rows(rows)
    }

    #[instrument(skip(self))]
    async fn update_role(
        &self,
        community_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE memberships SET role = $3 WHERE community_id = $1 AND user_id = $2",
        )
        .bind(community_id)
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MembershipNotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, community_id: Uuid, user_id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM memberships WHERE community_id = $1 AND user_id = $2")
            .bind(community_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MembershipNotFound);
        }

        Ok(())
    }
}
