//! Invitation handlers
//!
//! Management endpoints live under `/api`; the public invitation page is
//! `/invite/{token}`, which anyone can preview and signed-in visitors redeem.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use campus_core::policy::access::login_redirect;
use campus_service::dto::{
    CreateInvitationRequest, InvitationCreatedResponse, InvitationPreviewResponse,
    InvitationResponse, RedeemResponse,
};
use campus_service::InvitationService;
use tracing::info;

use crate::extractors::{
    ApiPath, AuthUser, CommunityIdPath, InvitationIdPath, InvitationTokenPath, OptionalAuthUser,
    OptionalValidatedJson,
};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Issue an invitation; the body may be omitted for an open member link
///
/// POST /api/communities/{community_id}/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CommunityIdPath>,
    OptionalValidatedJson(body): OptionalValidatedJson<CreateInvitationRequest>,
) -> ApiResult<Created<Json<InvitationCreatedResponse>>> {
    let service = InvitationService::new(state.service_context());
    let created = service
        .issue(&auth.caller, path.community_id, body.unwrap_or_default())
        .await?;
    Ok(Created(Json(created)))
}

/// List outstanding invitations
///
/// GET /api/communities/{community_id}/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CommunityIdPath>,
) -> ApiResult<Json<Vec<InvitationResponse>>> {
    let service = InvitationService::new(state.service_context());
    let invitations = service.list(&auth.caller, path.community_id).await?;
    Ok(Json(invitations))
}

/// Revoke an invitation
///
/// DELETE /api/invitations/{invitation_id}
pub async fn revoke_invitation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<InvitationIdPath>,
) -> ApiResult<NoContent> {
    InvitationService::new(state.service_context())
        .revoke(&auth.caller, path.invitation_id)
        .await?;
    Ok(NoContent)
}

/// Invitation landing data: invalid, expired, or the community it opens
///
/// GET /invite/{token}
pub async fn preview_invitation(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<InvitationTokenPath>,
) -> ApiResult<Json<InvitationPreviewResponse>> {
    let preview = InvitationService::new(state.service_context())
        .preview(&path.token)
        .await?;
    Ok(Json(preview))
}

/// Redeem an invitation; anonymous visitors are sent to sign in first
///
/// POST /invite/{token}
pub async fn redeem_invitation(
    State(state): State<AppState>,
    OptionalAuthUser(auth): OptionalAuthUser,
    ApiPath(path): ApiPath<InvitationTokenPath>,
) -> ApiResult<Response> {
    let Some(auth) = auth else {
        info!("Anonymous invitation redemption, redirecting to login");
        let back = format!("/invite/{}", path.token);
        return Ok(Redirect::to(&login_redirect(&back)).into_response());
    };

    let outcome = InvitationService::new(state.service_context())
        .redeem(Some(&auth.caller), &path.token)
        .await?;

    Ok(Json(RedeemResponse::from(outcome)).into_response())
}
