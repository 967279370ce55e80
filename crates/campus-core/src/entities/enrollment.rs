//! Enrollment entity - a user's access grant to a course

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::value_objects::money;

/// Payment provider recorded on paid enrollments
pub const PAYMENT_PROVIDER: &str = "flutterwave";

/// Enrollment lifecycle: pending -> active, or cancelled by an admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Pending,
    Active,
    Cancelled,
}

impl EnrollmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::ValidationError(format!(
                "unknown enrollment status: {other}"
            ))),
        }
    }
}

/// Enrollment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub status: EnrollmentStatus,
    pub provider: Option<String>,
    /// Reference sent to the provider as `tx_ref`
    pub reference: Option<String>,
    pub provider_transaction_id: Option<String>,
    /// Stored amount (whole units for XOF, cents otherwise)
    pub amount: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    /// Pending enrollment awaiting a payment webhook
    pub fn pending(user_id: Uuid, course_id: Uuid, amount: i64, currency: String) -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        Self {
            id,
            user_id,
            course_id,
            status: EnrollmentStatus::Pending,
            provider: Some(PAYMENT_PROVIDER.to_string()),
            reference: Some(id.to_string()),
            provider_transaction_id: None,
            amount,
            currency,
            created_at: now,
            updated_at: now,
        }
    }

    /// Immediately active, zero-amount enrollment for a free course
    pub fn free(user_id: Uuid, course_id: Uuid, currency: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            status: EnrollmentStatus::Active,
            provider: None,
            reference: None,
            provider_transaction_id: None,
            amount: 0,
            currency,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == EnrollmentStatus::Pending
    }

    /// Amount the provider must have collected for this enrollment
    pub fn expected_provider_amount(&self) -> f64 {
        money::to_provider_units(self.amount, &self.currency)
    }

    /// Transition to active, recording the provider's transaction id
    pub fn activate(&mut self, provider_transaction_id: String) {
        self.status = EnrollmentStatus::Active;
        self.provider_transaction_id = Some(provider_transaction_id);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_enrollment_reference_is_its_id() {
        let enrollment = Enrollment::pending(Uuid::new_v4(), Uuid::new_v4(), 5000, "XOF".into());
        assert!(enrollment.is_pending());
        assert_eq!(enrollment.reference, Some(enrollment.id.to_string()));
        assert_eq!(enrollment.provider.as_deref(), Some(PAYMENT_PROVIDER));
    }

    #[test]
    fn test_free_enrollment() {
        let enrollment = Enrollment::free(Uuid::new_v4(), Uuid::new_v4(), "XOF".into());
        assert!(enrollment.is_active());
        assert_eq!(enrollment.amount, 0);
        assert!(enrollment.provider.is_none());
    }

    #[test]
    fn test_expected_provider_amount() {
        let xof = Enrollment::pending(Uuid::new_v4(), Uuid::new_v4(), 5000, "XOF".into());
        assert!((xof.expected_provider_amount() - 5000.0).abs() < f64::EPSILON);

        let usd = Enrollment::pending(Uuid::new_v4(), Uuid::new_v4(), 2500, "USD".into());
        assert!((usd.expected_provider_amount() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_activate() {
        let mut enrollment = Enrollment::pending(Uuid::new_v4(), Uuid::new_v4(), 100, "USD".into());
        enrollment.activate("98765".into());
        assert!(enrollment.is_active());
        assert_eq!(enrollment.provider_transaction_id.as_deref(), Some("98765"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("cancelled".parse::<EnrollmentStatus>().unwrap(), EnrollmentStatus::Cancelled);
        assert!("done".parse::<EnrollmentStatus>().is_err());
    }
}
