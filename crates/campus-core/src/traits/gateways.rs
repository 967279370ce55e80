//! External provider ports - payment gateway and identity provider

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;

/// Result type for provider calls
pub type GatewayResult<T> = Result<T, DomainError>;

/// Hosted checkout request sent to the payment provider
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    /// Our reference; the enrollment id
    pub tx_ref: String,
    /// Amount in provider units
    pub amount: f64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub redirect_url: String,
    pub title: String,
}

/// Transaction as reported by the provider's verify endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedTransaction {
    /// Envelope status of the verify call (`success` on a good lookup)
    pub response_status: String,
    /// Charge status (`successful` once paid)
    pub status: String,
    pub amount: f64,
    pub currency: String,
    pub tx_ref: Option<String>,
}

impl VerifiedTransaction {
    pub fn is_successful(&self) -> bool {
        self.response_status == "success" && self.status == "successful"
    }

    /// Paid, and at least the expected amount
    pub fn covers(&self, expected_amount: f64) -> bool {
        self.is_successful() && self.amount >= expected_amount
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted payment and return the link the customer follows
    async fn create_payment(&self, request: &PaymentRequest) -> GatewayResult<String>;

    /// Look a transaction up by the provider's id
    async fn verify_transaction(&self, transaction_id: &str) -> GatewayResult<VerifiedTransaction>;
}

/// User returned by the identity provider after a code exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization code for the signed-in user
    async fn exchange_code(&self, code: &str) -> GatewayResult<IdentityUser>;
}
