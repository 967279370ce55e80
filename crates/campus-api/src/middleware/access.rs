//! Page access control
//!
//! Runs ahead of every route. Resolves the visitor's session (renewing it from
//! the refresh cookie when needed), applies the page access rules, and hands
//! the resolved caller to the extractors through request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use campus_core::{
    policy::access::{decide, login_redirect, ACCESS_DENIED_PATH, DASHBOARD_PATH},
    AccessDecision, PlatformRole,
};
use campus_service::PolicyService;
use tracing::{debug, warn};

use super::session::{self, Session, SessionCaller};
use crate::state::AppState;

/// Access control middleware, installed with `axum::middleware::from_fn_with_state`
pub async fn access_control(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = bearer.as_ref().map(|TypedHeader(Authorization(b))| b.token());
    let session = session::resolve(&state, bearer, &jar);
    let path = request.uri().path().to_string();

    let response = match decide(&path, session.is_some()) {
        AccessDecision::RedirectToLogin { next } => {
            debug!(path = %path, "Anonymous visitor sent to login");
            Redirect::temporary(&login_redirect(&next)).into_response()
        }
        AccessDecision::RedirectToDashboard => Redirect::temporary(DASHBOARD_PATH).into_response(),
        AccessDecision::RequireRole(roles) if !has_role(&state, session.as_ref(), roles).await => {
            debug!(path = %path, "Platform role not allowed");
            Redirect::temporary(ACCESS_DENIED_PATH).into_response()
        }
        AccessDecision::Continue | AccessDecision::RequireRole(_) => {
            if let Some(session) = &session {
                request
                    .extensions_mut()
                    .insert(SessionCaller(session.caller.clone()));
            }
            next.run(request).await
        }
    };

    match session.and_then(|s| s.refreshed) {
        Some(tokens) => {
            let jar = session::store(CookieJar::new(), &tokens, state.secure_cookies());
            (jar, response).into_response()
        }
        None => response,
    }
}

async fn has_role(state: &AppState, session: Option<&Session>, roles: &[PlatformRole]) -> bool {
    let Some(session) = session else {
        return false;
    };

    match PolicyService::new(state.service_context())
        .platform_role(&session.caller)
        .await
    {
        Ok(role) => roles.contains(&role),
        Err(e) => {
            warn!(error = %e, user_id = %session.caller.user_id, "Failed to load platform role");
            false
        }
    }
}
