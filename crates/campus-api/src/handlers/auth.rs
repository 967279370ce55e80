//! Session handlers
//!
//! The identity provider redirects back to `/auth/callback` with a one-time
//! code; from then on the session lives in HttpOnly cookies.

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use campus_common::TokenPair;
use campus_service::AuthService;
use serde::Deserialize;
use tracing::warn;

use crate::middleware::session::{self, REFRESH_TOKEN_COOKIE};
use crate::response::{ApiError, ApiResult, NoContent};
use crate::state::AppState;

/// Where a failed sign-in lands
pub const AUTH_CALLBACK_ERROR_PATH: &str = "/login?error=auth_callback";

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub next: Option<String>,
}

/// Exchange the provider's code for a session
///
/// GET /auth/callback?code=...&next=...
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let service = AuthService::new(state.service_context());

    match service
        .callback(params.code.as_deref(), params.next.as_deref())
        .await
    {
        Ok(signed_in) => {
            let jar = session::store(jar, &signed_in.tokens, state.secure_cookies());
            (jar, Redirect::to(&signed_in.redirect_to))
        }
        Err(e) => {
            warn!(error = %e, "Sign-in callback failed");
            (jar, Redirect::to(AUTH_CALLBACK_ERROR_PATH))
        }
    }
}

/// Rotate the session from the refresh cookie
///
/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<TokenPair>)> {
    let refresh_token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(Cookie::value)
        .ok_or(ApiError::MissingAuth)?;

    let (_, tokens) = AuthService::new(state.service_context()).refresh_session(refresh_token)?;

    let jar = session::store(jar, &tokens, state.secure_cookies());
    Ok((jar, Json(tokens)))
}

/// Drop the session cookies
///
/// POST /api/auth/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, NoContent) {
    (session::clear(jar), NoContent)
}
