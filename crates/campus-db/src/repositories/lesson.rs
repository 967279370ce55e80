//! PostgreSQL implementation of LessonRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campus_core::{CourseProgress, Lesson, LessonRepository, RepoResult};

use crate::models::{LessonModel, ProgressCountsModel};

use super::error::map_db_error;

/// PostgreSQL implementation of LessonRepository
#[derive(Clone)]
pub struct PgLessonRepository {
    pool: PgPool,
}

impl PgLessonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LessonRepository for PgLessonRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Lesson>> {
        let row = sqlx::query_as::<_, LessonModel>(
            "SELECT id, course_id, title, position FROM lessons WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Lesson::from))
    }

    #[instrument(skip(self, lesson), fields(lesson_id = %lesson.id))]
    async fn create(&self, lesson: &Lesson) -> RepoResult<()> {
        sqlx::query("INSERT INTO lessons (id, course_id, title, position) VALUES ($1, $2, $3, $4)")
            .bind(lesson.id)
            .bind(lesson.course_id)
            .bind(&lesson.title)
            .bind(lesson.position)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_completion(&self, user_id: Uuid, lesson_id: Uuid) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO lesson_progress (user_id, lesson_id, completed_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, lesson_id) DO UPDATE SET completed_at = EXCLUDED.completed_at
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn progress(&self, user_id: Uuid, course_id: Uuid) -> RepoResult<CourseProgress> {
        let counts = sqlx::query_as::<_, ProgressCountsModel>(
            r#"
            SELECT COUNT(lp.lesson_id) AS completed, COUNT(l.id) AS total
            FROM lessons l
            LEFT JOIN lesson_progress lp ON lp.lesson_id = l.id AND lp.user_id = $1
            WHERE l.course_id = $2
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(counts.into())
    }
}
