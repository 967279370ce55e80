//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campus_core::{DomainError, PlatformRole, Profile, ProfileRepository, RepoResult};

use crate::mappers::parse_column;
use crate::models::ProfileModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileModel>(
            r#"
            SELECT id, email, full_name, role, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Profile::try_from).transpose()
    }

    #[instrument(skip(self, profile), fields(profile_id = %profile.id))]
    async fn ensure(&self, profile: &Profile) -> RepoResult<Profile> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, email, full_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(&profile.full_name)
        .bind(profile.role.as_str())
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.find_by_id(profile.id)
            .await?
            .ok_or(DomainError::ProfileNotFound(profile.id))
    }

    #[instrument(skip(self, email))]
    async fn update_email(&self, id: Uuid, email: &str) -> RepoResult<()> {
        let result =
            sqlx::query("UPDATE profiles SET email = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(email)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ProfileNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn role_of(&self, id: Uuid) -> RepoResult<Option<PlatformRole>> {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        role.map(|raw| parse_column("profile role", &raw)).transpose()
    }
}
