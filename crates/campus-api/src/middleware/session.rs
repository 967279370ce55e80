//! Session cookies
//!
//! Browser sessions live in two HttpOnly cookies. API clients may send the
//! access token as a bearer header instead; the header wins when both exist.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use campus_common::TokenPair;
use campus_core::Caller;
use campus_service::AuthService;
use tracing::debug;

use crate::state::AppState;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Caller resolved by the access middleware, stored in request extensions
#[derive(Debug, Clone)]
pub struct SessionCaller(pub Caller);

/// A signed-in visitor, with fresh tokens when the old access token was renewed
#[derive(Debug, Clone)]
pub struct Session {
    pub caller: Caller,
    pub refreshed: Option<TokenPair>,
}

/// Resolve the visitor's session from a bearer token or the session cookies.
///
/// An expired or missing access token is renewed from the refresh cookie.
pub fn resolve(state: &AppState, bearer: Option<&str>, jar: &CookieJar) -> Option<Session> {
    let access = bearer.or_else(|| jar.get(ACCESS_TOKEN_COOKIE).map(Cookie::value));

    if let Some(token) = access {
        match state
            .jwt_service()
            .validate_access_token(token)
        {
            Ok(claims) => {
                return Some(Session {
                    caller: claims.caller(),
                    refreshed: None,
                })
            }
            Err(e) => debug!(error = %e, "Access token rejected"),
        }
    }

    let refresh_token = jar.get(REFRESH_TOKEN_COOKIE)?.value();
    match AuthService::new(state.service_context()).refresh_session(refresh_token) {
        Ok((claims, tokens)) => {
            debug!(user_id = %claims.sub, "Session refreshed");
            Some(Session {
                caller: claims.caller(),
                refreshed: Some(tokens),
            })
        }
        Err(e) => {
            debug!(error = %e, "Refresh token rejected");
            None
        }
    }
}

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Write both session cookies
#[must_use]
pub fn store(jar: CookieJar, tokens: &TokenPair, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        secure,
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
        secure,
    ))
}

/// Expire both session cookies
#[must_use]
pub fn clear(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/"))
}
