//! Space entity - a discussion or voice channel inside a community

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpaceKind {
    #[default]
    Discussion,
    Voice,
}

impl SpaceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discussion => "discussion",
            Self::Voice => "voice",
        }
    }
}

impl fmt::Display for SpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpaceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discussion" => Ok(Self::Discussion),
            "voice" => Ok(Self::Voice),
            other => Err(DomainError::ValidationError(format!("unknown space kind: {other}"))),
        }
    }
}

/// Space entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    pub id: Uuid,
    pub community_id: Uuid,
    pub name: String,
    pub kind: SpaceKind,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl Space {
    pub fn new(community_id: Uuid, name: String, kind: SpaceKind, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            community_id,
            name,
            kind,
            position,
            created_at: Utc::now(),
        }
    }
}
