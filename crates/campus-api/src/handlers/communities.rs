//! Community handlers
//!
//! Communities, their spaces, and their members.

use axum::{extract::State, Json};
use campus_service::dto::{
    AddMemberRequest, CommunityResponse, CreateCommunityRequest, CreateSpaceRequest, JoinResponse,
    MemberResponse, SpaceResponse, UpdateMemberRoleRequest,
};
use campus_service::{CommunityService, MembershipService, SpaceService};

use crate::extractors::{
    ApiPath, AuthUser, CommunityIdPath, CommunityMemberPath, SlugPath, ValidatedJson,
};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Create a community
///
/// POST /api/communities
pub async fn create_community(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateCommunityRequest>,
) -> ApiResult<Created<Json<CommunityResponse>>> {
    let community = CommunityService::new(state.service_context())
        .create(&auth.caller, request)
        .await?;
    Ok(Created(Json(community)))
}

/// Public community lookup
///
/// GET /api/communities/slug/{slug}
pub async fn get_community_by_slug(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<SlugPath>,
) -> ApiResult<Json<CommunityResponse>> {
    let community = CommunityService::new(state.service_context())
        .get_by_slug(&path.slug)
        .await?;
    Ok(Json(community))
}

/// Delete a community
///
/// DELETE /api/communities/{community_id}
pub async fn delete_community(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CommunityIdPath>,
) -> ApiResult<NoContent> {
    CommunityService::new(state.service_context())
        .delete(&auth.caller, path.community_id)
        .await?;
    Ok(NoContent)
}

/// Join a community directly
///
/// POST /api/communities/{community_id}/join
pub async fn join_community(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CommunityIdPath>,
) -> ApiResult<Json<JoinResponse>> {
    let joined = MembershipService::new(state.service_context())
        .join(&auth.caller, path.community_id)
        .await?;
    Ok(Json(joined))
}

/// GET /api/communities/{community_id}/spaces
pub async fn list_spaces(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CommunityIdPath>,
) -> ApiResult<Json<Vec<SpaceResponse>>> {
    let spaces = SpaceService::new(state.service_context())
        .list(&auth.caller, path.community_id)
        .await?;
    Ok(Json(spaces))
}

/// POST /api/communities/{community_id}/spaces
pub async fn create_space(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CommunityIdPath>,
    ValidatedJson(request): ValidatedJson<CreateSpaceRequest>,
) -> ApiResult<Created<Json<SpaceResponse>>> {
    let space = SpaceService::new(state.service_context())
        .create(&auth.caller, path.community_id, request)
        .await?;
    Ok(Created(Json(space)))
}

/// GET /api/communities/{community_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CommunityIdPath>,
) -> ApiResult<Json<Vec<MemberResponse>>> {
    let members = MembershipService::new(state.service_context())
        .list(&auth.caller, path.community_id)
        .await?;
    Ok(Json(members))
}

/// Add an existing profile as a member
///
/// POST /api/communities/{community_id}/members
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CommunityIdPath>,
    ValidatedJson(request): ValidatedJson<AddMemberRequest>,
) -> ApiResult<Json<JoinResponse>> {
    let added = MembershipService::new(state.service_context())
        .add(&auth.caller, path.community_id, request)
        .await?;
    Ok(Json(added))
}

/// PATCH /api/communities/{community_id}/members/{user_id}
pub async fn update_member_role(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CommunityMemberPath>,
    ValidatedJson(request): ValidatedJson<UpdateMemberRoleRequest>,
) -> ApiResult<NoContent> {
    MembershipService::new(state.service_context())
        .update_role(&auth.caller, path.community_id, path.user_id, request)
        .await?;
    Ok(NoContent)
}

/// Remove a member, or leave when `user_id` is the caller
///
/// DELETE /api/communities/{community_id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(path): ApiPath<CommunityMemberPath>,
) -> ApiResult<NoContent> {
    MembershipService::new(state.service_context())
        .remove(&auth.caller, path.community_id, path.user_id)
        .await?;
    Ok(NoContent)
}
