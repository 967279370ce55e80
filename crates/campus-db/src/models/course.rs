//! Course and lesson database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for courses table
#[derive(Debug, Clone, FromRow)]
pub struct CourseModel {
    pub id: Uuid,
    pub community_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: String,
    pub published: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Database model for lessons table
#[derive(Debug, Clone, FromRow)]
pub struct LessonModel {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub position: i32,
}

/// Aggregate row for course progress
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ProgressCountsModel {
    pub completed: i64,
    pub total: i64,
}
