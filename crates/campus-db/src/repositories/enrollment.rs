//! PostgreSQL implementation of EnrollmentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campus_core::{DomainError, Enrollment, EnrollmentRepository, RepoResult};

use crate::models::EnrollmentModel;

use super::error::map_db_error;

const ENROLLMENT_COLUMNS: &str = "id, user_id, course_id, status, provider, reference, \
     provider_transaction_id, amount, currency, created_at, updated_at";

/// PostgreSQL implementation of EnrollmentRepository
///
/// The partial unique index `uq_enrollments_live` allows one non-cancelled
/// row per (user, course). Inserts use `ON CONFLICT DO NOTHING` so a
/// duplicate reads as "already enrolled" rather than an error.
#[derive(Clone)]
pub struct PgEnrollmentRepository {
    pool: PgPool,
}

impl PgEnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentRepository for PgEnrollmentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentModel>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Enrollment::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_current(&self, user_id: Uuid, course_id: Uuid) -> RepoResult<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentModel>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments
             WHERE user_id = $1 AND course_id = $2 AND status <> 'cancelled'"
        ))
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Enrollment::try_from).transpose()
    }

    #[instrument(skip(self, enrollment), fields(enrollment_id = %enrollment.id, course_id = %enrollment.course_id))]
    async fn create(&self, enrollment: &Enrollment) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO enrollments (id, user_id, course_id, status, provider, reference,
                                     provider_transaction_id, amount, currency,
                                     created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(enrollment.id)
        .bind(enrollment.user_id)
        .bind(enrollment.course_id)
        .bind(enrollment.status.as_str())
        .bind(&enrollment.provider)
        .bind(&enrollment.reference)
        .bind(&enrollment.provider_transaction_id)
        .bind(enrollment.amount)
        .bind(&enrollment.currency)
        .bind(enrollment.created_at)
        .bind(enrollment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self, enrollments), fields(count = enrollments.len()))]
    async fn create_many(&self, enrollments: &[Enrollment]) -> RepoResult<u64> {
        if enrollments.is_empty() {
            return Ok(0);
        }

        let ids: Vec<Uuid> = enrollments.iter().map(|e| e.id).collect();
        let user_ids: Vec<Uuid> = enrollments.iter().map(|e| e.user_id).collect();
        let course_ids: Vec<Uuid> = enrollments.iter().map(|e| e.course_id).collect();
        let statuses: Vec<&str> = enrollments.iter().map(|e| e.status.as_str()).collect();
        let amounts: Vec<i64> = enrollments.iter().map(|e| e.amount).collect();
        let currencies: Vec<&str> = enrollments.iter().map(|e| e.currency.as_str()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO enrollments (id, user_id, course_id, status, amount, currency)
            SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::uuid[], $4::text[],
                                 $5::bigint[], $6::text[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(&ids)
        .bind(&user_ids)
        .bind(&course_ids)
        .bind(&statuses)
        .bind(&amounts)
        .bind(&currencies)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn update_pending_amount(&self, id: Uuid, amount: i64, currency: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE enrollments
            SET amount = $2, currency = $3, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(currency)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EnrollmentNotFound(id.to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn activate(&self, id: Uuid, provider_transaction_id: &str) -> RepoResult<bool> {
        // Replays hit an already-active row and rewrite the same values.
        let result = sqlx::query(
            r#"
            UPDATE enrollments
            SET status = 'active', provider_transaction_id = $2, updated_at = NOW()
            WHERE id = $1 AND status <> 'cancelled'
            "#,
        )
        .bind(id)
        .bind(provider_transaction_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn cancel(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE enrollments SET status = 'cancelled', updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EnrollmentNotFound(id.to_string()));
        }

        Ok(())
    }
}
