//! Notification entity - in-app messages written by workflow cascades

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    EnrollmentActivated,
    CommunityJoined,
    InvitationAccepted,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnrollmentActivated => "enrollment_activated",
            Self::CommunityJoined => "community_joined",
            Self::InvitationAccepted => "invitation_accepted",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enrollment_activated" => Ok(Self::EnrollmentActivated),
            "community_joined" => Ok(Self::CommunityJoined),
            "invitation_accepted" => Ok(Self::InvitationAccepted),
            other => Err(DomainError::ValidationError(format!(
                "unknown notification kind: {other}"
            ))),
        }
    }
}

/// Notification entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn new(user_id: Uuid, kind: NotificationKind, title: String, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title,
            body,
            link: None,
            created_at: Utc::now(),
            read_at: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}
