//! # campus-payments
//!
//! reqwest-backed adapters for the two external HTTP services the platform
//! talks to:
//!
//! - [`FlutterwaveGateway`] implements `PaymentGateway`: hosted checkout
//!   links and transaction re-verification.
//! - [`HttpIdentityProvider`] implements `IdentityProvider`: the
//!   authorization-code exchange behind `/auth/callback`.
//!
//! Both clients carry an outbound timeout so a slow provider fails the
//! request instead of holding it open.

mod flutterwave;
mod identity;

use std::time::Duration;

pub use flutterwave::{FlutterwaveConfig, FlutterwaveGateway};
pub use identity::{HttpIdentityProvider, IdentityConfig};

/// Timeout applied to every outbound provider call
pub const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(15);

fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(OUTBOUND_TIMEOUT)
        .build()
}
