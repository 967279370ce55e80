//! Role enums for community membership and platform accounts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Role a user holds inside a single community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    #[default]
    Member,
    Moderator,
    Admin,
}

impl MembershipRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Admins manage members, invitations and courses
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Moderators and admins curate spaces
    pub fn can_moderate(self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

/// Account-wide role stored on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlatformRole {
    #[default]
    Student,
    Creator,
    Admin,
}

impl PlatformRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Creator => "creator",
            Self::Admin => "admin",
        }
    }

    /// Creators and platform admins may open new communities
    pub fn can_create_communities(self) -> bool {
        matches!(self, Self::Creator | Self::Admin)
    }
}

impl fmt::Display for PlatformRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "creator" => Ok(Self::Creator),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}
