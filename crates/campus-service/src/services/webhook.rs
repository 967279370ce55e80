//! Payment webhook reconciler
//!
//! The callback body is never trusted on its own: after the shared-secret
//! check the transaction is re-read from the provider, and only a verified
//! charge that covers the recorded amount activates the enrollment.

use campus_core::{DomainError, Enrollment, MembershipRole, NotificationKind};
use secrecy::ExposeSecret;
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::membership::MembershipService;
use super::notification::NotificationService;

const SUCCESSFUL: &str = "successful";

/// What the webhook did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Charge status was not `successful`; nothing was touched
    NotSuccessful,
    /// Enrollment is active
    Activated {
        enrollment_id: Uuid,
        community_id: Option<Uuid>,
    },
    /// Verified, but the enrollment had been cancelled meanwhile
    Ignored { enrollment_id: Uuid },
}

impl WebhookOutcome {
    /// Short status echoed back to the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotSuccessful => "not successful",
            Self::Activated { .. } => "ok",
            Self::Ignored { .. } => "ignored",
        }
    }
}

/// Provider transaction ids arrive as numbers, occasionally as strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TransactionId {
    Number(i64),
    Text(String),
}

impl TransactionId {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Charge fields the reconciler reads
#[derive(Debug, Clone, Default, Deserialize)]
struct ChargeFields {
    status: Option<String>,
    tx_ref: Option<String>,
    id: Option<TransactionId>,
}

/// `{event, data: {...}}` envelope or a flat charge
#[derive(Debug, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    data: Option<ChargeFields>,
    #[serde(flatten)]
    top_level: ChargeFields,
}

impl WebhookPayload {
    fn charge(self) -> ChargeFields {
        self.data.unwrap_or(self.top_level)
    }
}

/// Payment webhook service
pub struct WebhookService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WebhookService<'a> {
    /// Create a new WebhookService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Constant-time check of the `verif-hash` header
    pub fn verify_hash(&self, provided: Option<&str>) -> ServiceResult<()> {
        let Some(provided) = provided else {
            warn!("Payment webhook without verification header");
            return Err(ServiceError::unauthorized());
        };

        let expected = self.ctx.webhook_hash().expose_secret().as_bytes();
        if bool::from(expected.ct_eq(provided.as_bytes())) {
            Ok(())
        } else {
            warn!("Payment webhook verification header mismatch");
            Err(ServiceError::unauthorized())
        }
    }

    /// Reconcile one provider callback
    #[instrument(skip(self, verif_hash, body), fields(body_len = body.len()))]
    pub async fn process(&self, verif_hash: Option<&str>, body: &[u8]) -> ServiceResult<WebhookOutcome> {
        self.verify_hash(verif_hash)?;

        let payload: WebhookPayload = serde_json::from_slice(body)
            .map_err(|e| ServiceError::validation(format!("Invalid webhook payload: {e}")))?;
        let charge = payload.charge();

        if charge.status.as_deref() != Some(SUCCESSFUL) {
            info!(status = ?charge.status, "Ignoring unsuccessful charge");
            return Ok(WebhookOutcome::NotSuccessful);
        }

        let tx_ref = charge
            .tx_ref
            .ok_or_else(|| ServiceError::validation("tx_ref is required"))?;
        let enrollment_id = Uuid::parse_str(&tx_ref)
            .map_err(|_| ServiceError::validation("tx_ref is not an enrollment reference"))?;
        let transaction_id = charge
            .id
            .map(TransactionId::into_string)
            .ok_or_else(|| ServiceError::validation("transaction id is required"))?;

        let enrollment = self
            .ctx
            .enrollment_repo()
            .find_by_id(enrollment_id)
            .await?
            .ok_or_else(|| DomainError::EnrollmentNotFound(tx_ref.clone()))?;

        self.verify_with_provider(&enrollment, &tx_ref, &transaction_id)
            .await?;

        let matched = self
            .ctx
            .enrollment_repo()
            .activate(enrollment.id, &transaction_id)
            .await?;
        if !matched {
            warn!(enrollment_id = %enrollment.id, "Verified payment for a cancelled enrollment");
            return Ok(WebhookOutcome::Ignored {
                enrollment_id: enrollment.id,
            });
        }

        info!(
            enrollment_id = %enrollment.id,
            transaction_id = %transaction_id,
            replay = enrollment.is_active(),
            "Enrollment activated"
        );

        let community_id = self.cascade(&enrollment).await;

        Ok(WebhookOutcome::Activated {
            enrollment_id: enrollment.id,
            community_id,
        })
    }

    /// Re-read the transaction and require it to cover the recorded amount
    async fn verify_with_provider(
        &self,
        enrollment: &Enrollment,
        tx_ref: &str,
        transaction_id: &str,
    ) -> ServiceResult<()> {
        let verified = self
            .ctx
            .payment_gateway()
            .verify_transaction(transaction_id)
            .await?;

        let expected = enrollment.expected_provider_amount();
        if !verified.covers(expected) {
            warn!(
                enrollment_id = %enrollment.id,
                verified_status = %verified.status,
                verified_amount = verified.amount,
                expected_amount = expected,
                "Payment verification failed"
            );
            return Err(DomainError::PaymentVerificationFailed(format!(
                "transaction {transaction_id} does not cover the enrollment"
            ))
            .into());
        }

        if !verified.currency.eq_ignore_ascii_case(&enrollment.currency) {
            warn!(
                enrollment_id = %enrollment.id,
                verified_currency = %verified.currency,
                expected_currency = %enrollment.currency,
                "Verified transaction is in another currency"
            );
            return Err(DomainError::PaymentVerificationFailed(format!(
                "transaction {transaction_id} currency mismatch"
            ))
            .into());
        }

        if verified.tx_ref.as_deref().is_some_and(|r| r != tx_ref) {
            warn!(enrollment_id = %enrollment.id, "Verified transaction belongs to another reference");
            return Err(DomainError::PaymentVerificationFailed(format!(
                "transaction {transaction_id} reference mismatch"
            ))
            .into());
        }

        Ok(())
    }

    /// Course community membership and a notification. Logged, never propagated.
    async fn cascade(&self, enrollment: &Enrollment) -> Option<Uuid> {
        let course = match self.ctx.course_repo().find_by_id(enrollment.course_id).await {
            Ok(course) => course,
            Err(e) => {
                warn!(enrollment_id = %enrollment.id, error = %e, "Course lookup failed after activation");
                None
            }
        };

        let community_id = course.as_ref().and_then(|c| c.community_id);
        if let Some(community_id) = community_id {
            if let Err(e) = MembershipService::new(self.ctx)
                .ensure_member(community_id, enrollment.user_id, MembershipRole::Member)
                .await
            {
                warn!(
                    enrollment_id = %enrollment.id,
                    community_id = %community_id,
                    error = %e,
                    "Membership cascade failed"
                );
            }
        }

        if enrollment.is_pending() {
            let title = course.map_or_else(|| "your course".to_string(), |c| c.title);
            NotificationService::new(self.ctx)
                .notify(
                    enrollment.user_id,
                    NotificationKind::EnrollmentActivated,
                    "Enrollment confirmed",
                    format!("Your payment went through. You now have access to {title}."),
                    Some(format!("/courses/{}", enrollment.course_id)),
                )
                .await;
        }

        community_id
    }
}
