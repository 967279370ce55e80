//! Profile entity - platform account keyed by the identity provider's user id

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::PlatformRole;

/// Profile entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: PlatformRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create a new student profile
    pub fn new(id: Uuid, email: Option<String>, full_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            full_name,
            role: PlatformRole::Student,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the stored email is missing but the provider now knows one
    pub fn needs_email_backfill(&self, provider_email: Option<&str>) -> bool {
        self.email.as_deref().map_or(true, str::is_empty) && provider_email.is_some()
    }
}
