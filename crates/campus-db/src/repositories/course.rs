//! PostgreSQL implementation of CourseRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campus_core::{Course, CourseRepository, DomainError, RepoResult};

use crate::models::CourseModel;

use super::error::map_db_error;

/// PostgreSQL implementation of CourseRepository
#[derive(Clone)]
pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseModel>(
            r#"
            SELECT id, community_id, title, description, price, currency, published,
                   created_by, created_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Course::from))
    }

    #[instrument(skip(self, course), fields(course_id = %course.id))]
    async fn create(&self, course: &Course) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, community_id, title, description, price, currency,
                                 published, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(course.id)
        .bind(course.community_id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.price)
        .bind(&course.currency)
        .bind(course.published)
        .bind(course.created_by)
        .bind(course.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_published(&self, id: Uuid, published: bool) -> RepoResult<()> {
        let result = sqlx::query("UPDATE courses SET published = $2 WHERE id = $1")
            .bind(id)
            .bind(published)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CourseNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_free_published(&self, community_id: Uuid) -> RepoResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseModel>(
            r#"
            SELECT id, community_id, title, description, price, currency, published,
                   created_by, created_at
            FROM courses
            WHERE community_id = $1 AND published AND price = 0
            ORDER BY created_at
            "#,
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Course::from).collect())
    }
}
