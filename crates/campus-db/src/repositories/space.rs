//! PostgreSQL implementation of SpaceRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campus_core::{RepoResult, Space, SpaceRepository};

use crate::mappers::collect_rows;
use crate::models::SpaceModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SpaceRepository
#[derive(Clone)]
pub struct PgSpaceRepository {
    pool: PgPool,
}

impl PgSpaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpaceRepository for PgSpaceRepository {
    #[instrument(skip(self, space), fields(space_id = %space.id, community_id = %space.community_id))]
    async fn create(&self, space: &Space) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO spaces (id, community_id, name, kind, position, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(space.id)
        .bind(space.community_id)
        .bind(&space.name)
        .bind(space.kind.as_str())
        .bind(space.position)
        .bind(space.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_community(&self, community_id: Uuid) -> RepoResult<Vec<Space>> {
        let rows = sqlx::query_as::<_, SpaceModel>(
            r#"
            SELECT id, community_id, name, kind, position, created_at
            FROM spaces
            WHERE community_id = $1
            ORDER BY position, created_at
            "#,
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        collect_rows(rows)
    }
}
