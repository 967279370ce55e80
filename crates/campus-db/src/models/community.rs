//! Community and space database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for communities table
#[derive(Debug, Clone, FromRow)]
pub struct CommunityModel {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for spaces table
#[derive(Debug, Clone, FromRow)]
pub struct SpaceModel {
    pub id: Uuid,
    pub community_id: Uuid,
    pub name: String,
    pub kind: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}
