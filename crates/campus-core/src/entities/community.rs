//! Community entity - a creator-owned tenant with spaces, courses and members

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

const SLUG_MIN_LEN: usize = 3;
const SLUG_MAX_LEN: usize = 48;

/// Community entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    pub id: Uuid,
    /// Unique, immutable URL handle
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Community {
    /// Create a new Community
    pub fn new(slug: String, name: String, creator_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug,
            name,
            description: None,
            creator_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    #[inline]
    pub fn is_creator(&self, user_id: Uuid) -> bool {
        self.creator_id == user_id
    }
}

/// Validate a community slug: lowercase ASCII letters, digits and inner hyphens
pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
    let len_ok = (SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&slug.len());
    let chars_ok = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let edges_ok = !slug.starts_with('-') && !slug.ends_with('-');

    if len_ok && chars_ok && edges_ok {
        Ok(())
    } else {
        Err(DomainError::InvalidSlug(slug.to_string()))
    }
}
