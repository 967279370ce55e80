//! Flutterwave payment gateway adapter.
//!
//! Two calls are used:
//!
//! - `POST /v3/payments` creates a hosted payment and returns its link.
//! - `GET /v3/transactions/{id}/verify` re-reads a transaction so the
//!   webhook never trusts the callback body alone.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use campus_core::{DomainError, GatewayResult, PaymentGateway, PaymentRequest, VerifiedTransaction};

use crate::build_client;

const DEFAULT_BASE_URL: &str = "https://api.flutterwave.com";

/// Flutterwave API configuration.
#[derive(Clone)]
pub struct FlutterwaveConfig {
    secret_key: SecretString,
    api_base_url: String,
}

impl FlutterwaveConfig {
    pub fn new(secret_key: SecretString) -> Self {
        Self {
            secret_key,
            api_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for FlutterwaveConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlutterwaveConfig")
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

/// Payment gateway over the Flutterwave v3 API.
#[derive(Debug, Clone)]
pub struct FlutterwaveGateway {
    config: FlutterwaveConfig,
    http_client: reqwest::Client,
}

impl FlutterwaveGateway {
    pub fn new(config: FlutterwaveConfig) -> GatewayResult<Self> {
        let http_client = build_client()
            .map_err(|e| DomainError::PaymentGatewayError(format!("client setup: {e}")))?;
        Ok(Self { config, http_client })
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct PaymentBody<'a> {
    tx_ref: &'a str,
    amount: f64,
    currency: &'a str,
    redirect_url: &'a str,
    customer: Customer<'a>,
    customizations: Customizations<'a>,
}

#[derive(Debug, Serialize)]
struct Customer<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Customizations<'a> {
    title: &'a str,
}

impl<'a> From<&'a PaymentRequest> for PaymentBody<'a> {
    fn from(request: &'a PaymentRequest) -> Self {
        Self {
            tx_ref: &request.tx_ref,
            amount: request.amount,
            currency: &request.currency,
            redirect_url: &request.redirect_url,
            customer: Customer {
                email: request.customer_email.as_deref(),
                name: request.customer_name.as_deref(),
            },
            customizations: Customizations {
                title: &request.title,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    data: Option<PaymentLink>,
}

#[derive(Debug, Deserialize)]
struct PaymentLink {
    link: String,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    status: String,
    data: Option<VerifyData>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    status: String,
    amount: f64,
    currency: String,
    #[serde(default)]
    tx_ref: Option<String>,
}

fn payment_link(response: PaymentResponse) -> GatewayResult<String> {
    match response.data {
        Some(data) if response.status == "success" => Ok(data.link),
        _ => Err(DomainError::PaymentGatewayError(
            response
                .message
                .unwrap_or_else(|| format!("payment creation returned status {}", response.status)),
        )),
    }
}

/// Transaction ids are numeric; anything else never reaches a URL that
/// carries the secret key.
fn verify_url(base_url: &str, transaction_id: &str) -> GatewayResult<String> {
    if transaction_id.is_empty() || !transaction_id.bytes().all(|b| b.is_ascii_digit()) {
        warn!(transaction_id, "Rejecting non-numeric transaction id");
        return Err(DomainError::PaymentVerificationFailed(
            "transaction id must be numeric".to_string(),
        ));
    }
    Ok(format!(
        "{}/v3/transactions/{transaction_id}/verify",
        base_url.trim_end_matches('/')
    ))
}

fn verified(response: VerifyResponse) -> GatewayResult<VerifiedTransaction> {
    let data = response.data.ok_or_else(|| {
        DomainError::PaymentVerificationFailed("verify response carried no transaction".to_string())
    })?;
    Ok(VerifiedTransaction {
        response_status: response.status,
        status: data.status,
        amount: data.amount,
        currency: data.currency,
        tx_ref: data.tx_ref,
    })
}

#[async_trait]
impl PaymentGateway for FlutterwaveGateway {
    #[instrument(skip(self, request), fields(tx_ref = %request.tx_ref, currency = %request.currency))]
    async fn create_payment(&self, request: &PaymentRequest) -> GatewayResult<String> {
        let url = format!("{}/v3/payments", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .json(&PaymentBody::from(request))
            .send()
            .await
            .map_err(|e| DomainError::PaymentGatewayError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(%status, "Payment provider rejected checkout");
            return Err(DomainError::PaymentGatewayError(format!(
                "provider returned {status}: {error_text}"
            )));
        }

        let body: PaymentResponse = response.json().await.map_err(|e| {
            DomainError::PaymentGatewayError(format!("failed to parse payment response: {e}"))
        })?;

        payment_link(body)
    }

    #[instrument(skip(self))]
    async fn verify_transaction(&self, transaction_id: &str) -> GatewayResult<VerifiedTransaction> {
        let url = verify_url(&self.config.api_base_url, transaction_id)?;

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .send()
            .await
            .map_err(|e| DomainError::PaymentGatewayError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Transaction verification request failed");
            return Err(DomainError::PaymentVerificationFailed(format!(
                "verify endpoint returned {status}"
            )));
        }

        let body: VerifyResponse = response.json().await.map_err(|e| {
            DomainError::PaymentVerificationFailed(format!("failed to parse verify response: {e}"))
        })?;

        verified(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_body_shape() {
        let request = PaymentRequest {
            tx_ref: "ref-1".into(),
            amount: 50.0,
            currency: "NGN".into(),
            customer_email: Some("ada@example.com".into()),
            customer_name: None,
            redirect_url: "http://localhost:3000/courses/x?payment=complete".into(),
            title: "Rust 101".into(),
        };

        let json = serde_json::to_value(PaymentBody::from(&request)).unwrap();
        assert_eq!(json["tx_ref"], "ref-1");
        assert_eq!(json["amount"], 50.0);
        assert_eq!(json["customer"]["email"], "ada@example.com");
        assert!(json["customer"].get("name").is_none());
        assert_eq!(json["customizations"]["title"], "Rust 101");
    }

    #[test]
    fn test_payment_link_extraction() {
        let ok: PaymentResponse = serde_json::from_str(
            r#"{"status":"success","message":"Hosted Link","data":{"link":"https://checkout.example/abc"}}"#,
        )
        .unwrap();
        assert_eq!(payment_link(ok).unwrap(), "https://checkout.example/abc");

        let failed: PaymentResponse =
            serde_json::from_str(r#"{"status":"error","message":"Invalid currency","data":null}"#)
                .unwrap();
        let err = payment_link(failed).unwrap_err();
        assert!(err.is_external());
        assert!(err.to_string().contains("Invalid currency"));
    }

    #[test]
    fn test_verify_response_parsing() {
        let body: VerifyResponse = serde_json::from_str(
            r#"{
                "status": "success",
                "message": "Transaction fetched successfully",
                "data": {
                    "id": 288200108,
                    "tx_ref": "4a1c",
                    "amount": 5000,
                    "currency": "XOF",
                    "status": "successful"
                }
            }"#,
        )
        .unwrap();

        let tx = verified(body).unwrap();
        assert!(tx.is_successful());
        assert!(tx.covers(5000.0));
        assert_eq!(tx.tx_ref.as_deref(), Some("4a1c"));
    }

    #[test]
    fn test_verify_url_accepts_numeric_ids_only() {
        assert_eq!(
            verify_url("https://api.flutterwave.com/", "4113").unwrap(),
            "https://api.flutterwave.com/v3/transactions/4113/verify"
        );

        for id in ["", "../../v3/transfers", "12/../34", "12?x=1", "12%2F34", " 12"] {
            assert!(
                matches!(
                    verify_url("https://api.flutterwave.com", id),
                    Err(DomainError::PaymentVerificationFailed(_))
                ),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_verify_without_data_fails() {
        let body: VerifyResponse =
            serde_json::from_str(r#"{"status":"error","message":"No transaction was found"}"#)
                .unwrap();
        assert!(verified(body).is_err());
    }

    #[test]
    fn test_config_debug_hides_key() {
        let config = FlutterwaveConfig::new(SecretString::new("FLWSECK-secret".to_string()))
            .with_base_url("http://localhost:9000/");
        let debug = format!("{config:?}");
        assert!(!debug.contains("FLWSECK"));
        assert!(debug.contains("http://localhost:9000\""));
    }
}
