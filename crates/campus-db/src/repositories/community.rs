//! PostgreSQL implementation of CommunityRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campus_core::{Community, CommunityRepository, DomainError, MembershipRole, RepoResult};

use crate::models::CommunityModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of CommunityRepository
#[derive(Clone)]
pub struct PgCommunityRepository {
    pool: PgPool,
}

impl PgCommunityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunityRepository for PgCommunityRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Community>> {
        let row = sqlx::query_as::<_, CommunityModel>(
            r#"
            SELECT id, slug, name, description, creator_id, created_at, updated_at
            FROM communities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Community::from))
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Community>> {
        let row = sqlx::query_as::<_, CommunityModel>(
            r#"
            SELECT id, slug, name, description, creator_id, created_at, updated_at
            FROM communities
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Community::from))
    }

    #[instrument(skip(self, community), fields(slug = %community.slug))]
    async fn create(&self, community: &Community) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO communities (id, slug, name, description, creator_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(community.id)
        .bind(&community.slug)
        .bind(&community.name)
        .bind(&community.description)
        .bind(community.creator_id)
        .bind(community.created_at)
        .bind(community.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::SlugTaken))?;

        sqlx::query(
            r#"
            INSERT INTO memberships (community_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(community.id)
        .bind(community.creator_id)
        .bind(MembershipRole::Admin.as_str())
        .bind(community.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM communities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CommunityNotFound(id.to_string()));
        }

        Ok(())
    }
}
