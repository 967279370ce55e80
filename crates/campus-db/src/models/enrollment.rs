//! Enrollment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for enrollments table
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub status: String,
    pub provider: Option<String>,
    pub reference: Option<String>,
    pub provider_transaction_id: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
