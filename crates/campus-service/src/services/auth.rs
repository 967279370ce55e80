//! Auth service
//!
//! Completes the identity provider's code-exchange redirect and mints the
//! session tokens the API stores in cookies.

use campus_common::{Claims, TokenPair};
use campus_core::policy::access::is_safe_redirect;
use campus_core::{DomainError, Profile};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Landing page after a first sign-in without an explicit destination
pub const DEFAULT_POST_LOGIN_PATH: &str = "/onboarding";

/// Result of a successful callback
#[derive(Debug, Clone)]
pub struct AuthCallback {
    pub tokens: TokenPair,
    /// Same-origin path to send the browser to
    pub redirect_to: String,
}

/// Auth service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Exchange the provider's code, make sure a profile exists and open a session
    #[instrument(skip(self, code))]
    pub async fn callback(&self, code: Option<&str>, next: Option<&str>) -> ServiceResult<AuthCallback> {
        let code = code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| DomainError::IdentityProviderError("missing authorization code".into()))?;

        let user = self.ctx.identity_provider().exchange_code(code).await?;

        let profile = self
            .ctx
            .profile_repo()
            .ensure(&Profile::new(user.id, user.email.clone(), user.full_name.clone()))
            .await?;

        if let Some(email) = user.email.as_deref() {
            if profile.needs_email_backfill(Some(email)) {
                match self.ctx.profile_repo().update_email(profile.id, email).await {
                    Ok(()) => info!(user_id = %profile.id, "Backfilled profile email"),
                    Err(e) => warn!(user_id = %profile.id, error = %e, "Profile email backfill failed"),
                }
            }
        }

        let email = user.email.or(profile.email);
        let tokens = self.ctx.jwt_service().generate_token_pair(user.id, email)?;

        let redirect_to = next
            .filter(|n| is_safe_redirect(n))
            .unwrap_or(DEFAULT_POST_LOGIN_PATH)
            .to_string();

        info!(user_id = %user.id, redirect_to = %redirect_to, "Signed in");

        Ok(AuthCallback { tokens, redirect_to })
    }

    /// Rotate a session from its refresh token
    #[instrument(skip_all)]
    pub fn refresh_session(&self, refresh_token: &str) -> ServiceResult<(Claims, TokenPair)> {
        Ok(self.ctx.jwt_service().refresh_tokens(refresh_token)?)
    }
}
