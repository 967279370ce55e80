//! Invitation database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for invitations table
#[derive(Debug, Clone, FromRow)]
pub struct InvitationModel {
    pub id: Uuid,
    pub community_id: Uuid,
    pub email: Option<String>,
    pub token: String,
    pub role: String,
    pub invited_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}
