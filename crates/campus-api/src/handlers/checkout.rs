//! Checkout and webhook handlers

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use campus_service::dto::{CheckoutRequest, CheckoutResponse, WebhookResponse};
use campus_service::{CheckoutService, WebhookService};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::middleware::WEBHOOK_HASH_HEADER;
use crate::response::ApiResult;
use crate::state::AppState;

/// Start a hosted payment for a paid course
///
/// POST /api/checkout
pub async fn checkout(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    let response = CheckoutService::new(state.service_context())
        .checkout(&auth.caller, request)
        .await?;
    Ok(Json(response))
}

/// Payment provider webhook
///
/// POST /api/webhook/payment
///
/// The body is taken raw: the signature header is checked before anything
/// is parsed.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    let verif_hash = headers
        .get(WEBHOOK_HASH_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = WebhookService::new(state.service_context())
        .process(verif_hash, &body)
        .await?;

    Ok(Json(WebhookResponse {
        status: outcome.as_str(),
    }))
}
