//! Authentication extractors
//!
//! The access middleware normally resolves the session first and leaves the
//! caller in request extensions. Routers built without it still work: the
//! extractors then read the bearer header or the access token cookie directly.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use campus_core::Caller;

use crate::middleware::session::{SessionCaller, ACCESS_TOKEN_COOKIE};
use crate::response::ApiError;
use crate::state::AppState;

/// Signed-in caller; rejects with 401 when there is no valid session
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub caller: Caller,
}

impl AuthUser {
    pub fn new(caller: Caller) -> Self {
        Self { caller }
    }
}

async fn caller_from_parts<S>(parts: &mut Parts, state: &S) -> Result<Option<Caller>, ApiError>
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    if let Some(SessionCaller(caller)) = parts.extensions.get::<SessionCaller>() {
        return Ok(Some(caller.clone()));
    }

    let bearer = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());
    let token = bearer.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(ACCESS_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
    });

    let Some(token) = token else {
        return Ok(None);
    };

    let app_state = AppState::from_ref(state);
    let claims = app_state
        .jwt_service()
        .validate_access_token(&token)
        .map_err(|e| {
            tracing::warn!(error = %e, "Invalid access token");
            ApiError::InvalidSession
        })?;

    Ok(Some(claims.caller()))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        caller_from_parts(parts, state)
            .await?
            .map(AuthUser::new)
            .ok_or(ApiError::MissingAuth)
    }
}

/// Optional signed-in caller
///
/// Anonymous visitors and stale sessions both come through as `None`, so
/// handlers can send them to the login page instead of failing.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let caller = caller_from_parts(parts, state).await.unwrap_or(None);
        Ok(OptionalAuthUser(caller.map(AuthUser::new)))
    }
}
