//! Validated JSON and query extractors
//!
//! Deserialize with serde, then run the `validator` rules on the result.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::{header, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// JSON body that passed its `validator` rules
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError::invalid_body(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Like [`ValidatedJson`], but a request without a body (no or zero
/// `Content-Length`) yields `None`.
#[derive(Debug, Clone)]
pub struct OptionalValidatedJson<T>(pub Option<T>);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let has_body = req
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<usize>().ok())
            .is_some_and(|len| len > 0);

        if !has_body {
            return Ok(OptionalValidatedJson(None));
        }

        let ValidatedJson(value) = ValidatedJson::from_request(req, state).await?;
        Ok(OptionalValidatedJson(Some(value)))
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedQuery(value))
    }
}
