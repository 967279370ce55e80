//! Invitation entity - a time-bounded token granting community membership

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::value_objects::MembershipRole;

/// Length of generated invitation tokens
pub const INVITATION_TOKEN_LEN: usize = 32;

/// How long an invitation stays redeemable
pub const INVITATION_TTL_DAYS: i64 = 7;

/// Invitation entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub id: Uuid,
    pub community_id: Uuid,
    /// When set, only the holder of this exact email may redeem
    pub email: Option<String>,
    pub token: String,
    pub role: MembershipRole,
    pub invited_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

/// What happens to an invitation once it has been redeemed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumption {
    /// Email-scoped invitations are single use
    Delete,
    /// Open links stay reusable; only the acceptance time is recorded
    MarkAccepted,
}

impl Invitation {
    /// Create a new invitation with a fresh token, expiring in seven days
    pub fn new(
        community_id: Uuid,
        email: Option<String>,
        role: MembershipRole,
        invited_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            community_id,
            email,
            token: generate_invitation_token(),
            role,
            invited_by,
            created_at: now,
            expires_at: now + Duration::days(INVITATION_TTL_DAYS),
            accepted_at: None,
        }
    }

    /// Expired once the current time reaches `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_email_scoped(&self) -> bool {
        self.email.is_some()
    }

    /// Check whether a caller with the given verified email may redeem.
    ///
    /// The comparison is exact, including letter case.
    pub fn admits(&self, caller_email: Option<&str>) -> bool {
        match self.email.as_deref() {
            None => true,
            Some(scoped) => caller_email == Some(scoped),
        }
    }

    pub fn consumption(&self) -> Consumption {
        if self.is_email_scoped() {
            Consumption::Delete
        } else {
            Consumption::MarkAccepted
        }
    }

    /// Shareable link for this invitation
    pub fn link(&self, site_url: &str) -> String {
        format!("{}/invite/{}", site_url.trim_end_matches('/'), self.token)
    }
}

/// Generate a cryptographically secure random invitation token
pub fn generate_invitation_token() -> String {
    use rand::Rng;

    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::thread_rng();
    (0..INVITATION_TOKEN_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
